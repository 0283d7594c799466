//! Presentation boundary.
//!
//! Rendering the overlay is out of scope; the pipeline only hands results and
//! lifecycle notifications to this port.

use serde::Serialize;

use crate::domain::ticket::{TicketId, TROUBLESHOOTING_HINT};

/// Transient status notifications for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PipelineEvent {
    #[serde(rename_all = "camelCase")]
    Started { ticket_id: TicketId },
    #[serde(rename_all = "camelCase")]
    Succeeded { ticket_id: TicketId },
    #[serde(rename_all = "camelCase")]
    Failed { ticket_id: TicketId, message: String },
}

/// What the overlay shows for a ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OverlayView {
    Details {
        #[serde(rename = "ticketId")]
        ticket_id: TicketId,
        data: serde_json::Value,
    },
    Error {
        #[serde(rename = "ticketId")]
        ticket_id: TicketId,
        #[serde(rename = "error")]
        message: String,
        troubleshooting: String,
    },
}

impl OverlayView {
    /// Builds an error view carrying the fixed troubleshooting hint.
    pub fn error(ticket_id: TicketId, message: impl Into<String>) -> Self {
        OverlayView::Error {
            ticket_id,
            message: message.into(),
            troubleshooting: TROUBLESHOOTING_HINT.to_string(),
        }
    }

    pub fn ticket_id(&self) -> &TicketId {
        match self {
            OverlayView::Details { ticket_id, .. } | OverlayView::Error { ticket_id, .. } => {
                ticket_id
            }
        }
    }
}

/// Port for the overlay / notification layer.
pub trait OverlayPresenter: Send + Sync {
    fn lifecycle(&self, event: PipelineEvent);

    fn render(&self, view: OverlayView);
}
