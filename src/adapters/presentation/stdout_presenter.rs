//! Presenter writing rendered views to stdout as JSON, one per line.

use std::io::Write;
use tracing::{debug, warn};

use crate::ports::{OverlayPresenter, OverlayView, PipelineEvent};

#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPresenter {
    pretty: bool,
}

impl StdoutPresenter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json(&self, view: &OverlayView) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(view)
        } else {
            serde_json::to_string(view)
        }
    }
}

impl OverlayPresenter for StdoutPresenter {
    fn lifecycle(&self, event: PipelineEvent) {
        debug!(?event, "Pipeline lifecycle");
    }

    fn render(&self, view: OverlayView) {
        let json = match self.to_json(&view) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize overlay view");
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            warn!(error = %e, "Failed to write overlay view");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::TicketId;
    use serde_json::json;

    #[test]
    fn error_view_serializes_with_troubleshooting_hint() {
        let view = OverlayView::error(TicketId::new("5").unwrap(), "404 Not Found");
        let json: serde_json::Value =
            serde_json::from_str(&StdoutPresenter::new(false).to_json(&view).unwrap()).unwrap();

        assert_eq!(json["ticketId"], json!("5"));
        assert_eq!(json["error"], json!("404 Not Found"));
        assert!(json["troubleshooting"].as_str().unwrap().contains("refreshing"));
    }
}
