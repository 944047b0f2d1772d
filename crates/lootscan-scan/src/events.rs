use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use lootscan_core::types::{AppStatus, ItemReport, ScanReport};

/// Progress emitted by a running scan, in order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScanEvent {
    /// The status line changed.
    Status {
        status: AppStatus,
        message: Option<String>,
    },
    /// OCR finished and its lines were cleaned and corrected.
    TextExtracted { lines: Vec<String> },
    /// One distinct item name was looked up.
    ItemResolved(ItemReport),
    /// The scan completed; carries the full report.
    Finished(ScanReport),
}

impl ScanEvent {
    pub fn status(status: AppStatus, message: impl Into<String>) -> Self {
        ScanEvent::Status {
            status,
            message: Some(message.into()),
        }
    }

    /// Rendered status line, if this is a status event.
    pub fn status_line(&self) -> Option<String> {
        match self {
            ScanEvent::Status { status, message } => Some(status.line(message.as_deref())),
            _ => None,
        }
    }
}

/// Send an event, logging status changes. A dropped receiver is ignored.
pub(crate) fn emit(tx: &UnboundedSender<ScanEvent>, event: ScanEvent) {
    if let Some(line) = event.status_line() {
        info!("Status updated to: {}", line);
    }
    let _ = tx.send(event);
}
