//! Remote users API: the `UsersApi` seam and its HTTP implementation.
//!
//! One endpoint serves both the JSON listing and the binary exports; the
//! presence of `documentType` in the query switches between them.
//!
pub mod model;

use std::fmt::{Display, Formatter};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::debug;

pub use model::{Address, DocumentType, QueryFilter, ResultPage, UserId, UserRecord};

/// A failed listing or export request.
#[derive(Debug)]
pub enum ApiError {
    /// Connection, TLS or timeout failure before a status was received.
    Transport(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The listing body was not a valid `{ data, total }` document.
    Decode(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "request failed: {msg}"),
            ApiError::Status(code) => write!(f, "request failed with HTTP status {code}"),
            ApiError::Decode(msg) => write!(f, "invalid users response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operations the report screen needs from the users service.
///
/// Implementations must be shareable across worker threads.
pub trait UsersApi: Send + Sync {
    /// Fetch one page of users matching `filter`.
    fn fetch_page(&self, filter: &QueryFilter) -> ApiResult<ResultPage>;

    /// Fetch the export of the records matching `filter` as an opaque document.
    fn fetch_document(&self, filter: &QueryFilter, format: DocumentType) -> ApiResult<Vec<u8>>;
}

/// Blocking `reqwest` client bound to the configured users endpoint.
#[derive(Clone, Debug)]
pub struct HttpUsersApi {
    client: Client,
    base_url: String,
}

impl HttpUsersApi {
    /// Build a client for `base_url`; `timeout` of `None` keeps reqwest's defaults.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to configure HTTP client: {e}")))?;
        Ok(Self { client, base_url: base_url.into() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> ApiResult<Response> {
        let response = request.send().map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

impl UsersApi for HttpUsersApi {
    fn fetch_page(&self, filter: &QueryFilter) -> ApiResult<ResultPage> {
        debug!(page = filter.page, per_page = filter.per_page, search = %filter.search, "fetching users page");
        let response = self.send(self.client.get(&self.base_url).query(filter))?;
        response.json::<ResultPage>().map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn fetch_document(&self, filter: &QueryFilter, format: DocumentType) -> ApiResult<Vec<u8>> {
        debug!(page = filter.page, per_page = filter.per_page, search = %filter.search, format = format.as_param(), "fetching users document");
        let request = self
            .client
            .get(&self.base_url)
            .query(filter)
            .query(&[("documentType", format.as_param())]);
        let response = self.send(request)?;
        let bytes = response.bytes().map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
