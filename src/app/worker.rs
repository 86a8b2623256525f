//! Background request runner.
//!
//! Each fetch or download runs on its own thread against the shared
//! [`UsersApi`]; results come back to the event loop as [`WorkerEvent`]s.
//! Requests are never cancelled once started.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::{ApiResult, DocumentType, ResultPage, UsersApi};
use crate::app::filter::{DownloadTicket, FetchTicket};
use crate::error::DynError;
use crate::report;

/// Completion of a background request.
#[derive(Debug)]
pub enum WorkerEvent {
    Fetched {
        seq: u64,
        result: ApiResult<ResultPage>,
    },
    Downloaded {
        format: DocumentType,
        result: std::result::Result<PathBuf, DynError>,
    },
}

pub struct Worker {
    api: Arc<dyn UsersApi>,
    output_dir: PathBuf,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl Worker {
    pub fn new(api: Arc<dyn UsersApi>, output_dir: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            output_dir: output_dir.into(),
            tx,
            rx,
        }
    }

    pub fn spawn_fetch(&self, ticket: FetchTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        debug!(seq = ticket.seq, "spawning users fetch");
        thread::spawn(move || {
            let result = api.fetch_page(&ticket.filter);
            if tx.send(WorkerEvent::Fetched { seq: ticket.seq, result }).is_err() {
                debug!(seq = ticket.seq, "event loop gone, dropping users page");
            }
        });
    }

    pub fn spawn_download(&self, ticket: DownloadTicket) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let dir = self.output_dir.clone();
        debug!(format = ticket.format.as_param(), "spawning users report download");
        thread::spawn(move || {
            let result = api
                .fetch_document(&ticket.filter, ticket.format)
                .map_err(|e| Box::new(e) as DynError)
                .and_then(|bytes| report::save_report(&dir, ticket.format, &bytes));
            let event = WorkerEvent::Downloaded { format: ticket.format, result };
            if tx.send(event).is_err() {
                warn!("event loop gone before download completed");
            }
        });
    }

    /// Next completed request, without blocking.
    pub fn try_next(&self) -> Option<WorkerEvent> {
        self.rx.try_recv().ok()
    }

    /// Next completed request, waiting at most `timeout`.
    pub fn next_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}
