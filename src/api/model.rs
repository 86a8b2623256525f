//! Wire types for the users listing and export endpoints.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifier of a user record. The API may send it as a number or a string,
/// it is only ever displayed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Postal address nested inside a [`UserRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

/// One row of the users report.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
}

/// One page of users plus the total count of records matching the search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ResultPage {
    #[serde(default)]
    pub data: Vec<UserRecord>,
    #[serde(default)]
    pub total: u64,
}

/// Parameters shared by every listing and export request.
///
/// Field names serialize to the query parameters the API expects
/// (`page`, `perPage`, `search`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryFilter {
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
    pub search: String,
}

impl QueryFilter {
    pub const DEFAULT_PER_PAGE: u32 = 10;

    /// First page with the given page size and no search text.
    pub fn with_per_page(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            search: String::new(),
        }
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::with_per_page(Self::DEFAULT_PER_PAGE)
    }
}

/// Export format discriminator sent as `documentType`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DocumentType {
    Excel,
    Pdf,
}

impl DocumentType {
    pub const ALL: [DocumentType; 2] = [DocumentType::Excel, DocumentType::Pdf];

    /// Value of the `documentType` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            DocumentType::Excel => "excel",
            DocumentType::Pdf => "pdf",
        }
    }

    /// File extension of the exported document; anything but PDF is a spreadsheet.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Excel => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Excel => "Excel",
            DocumentType::Pdf => "PDF",
        }
    }
}
