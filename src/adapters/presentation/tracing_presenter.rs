//! Presenter that only logs, for headless runs.

use tracing::{info, warn};

use crate::ports::{OverlayPresenter, OverlayView, PipelineEvent};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl OverlayPresenter for TracingPresenter {
    fn lifecycle(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::Started { ticket_id } => {
                info!(ticket_id = %ticket_id, "Fetching ticket details...")
            }
            PipelineEvent::Succeeded { ticket_id } => {
                info!(ticket_id = %ticket_id, "Ticket details fetched successfully")
            }
            PipelineEvent::Failed { ticket_id, message } => {
                warn!(ticket_id = %ticket_id, "Failed to fetch ticket details: {}", message)
            }
        }
    }

    fn render(&self, view: OverlayView) {
        match &view {
            OverlayView::Details { ticket_id, .. } => {
                info!(ticket_id = %ticket_id, "Rendering ticket details")
            }
            OverlayView::Error {
                ticket_id,
                message,
                troubleshooting,
            } => warn!(ticket_id = %ticket_id, troubleshooting = %troubleshooting, "{}", message),
        }
    }
}
