//! The single outbound request this system makes.

use serde::{Deserialize, Serialize};

use super::ticket_id::TicketId;

/// `GET <base>/<ticketId>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub target_url: String,
    pub ticket_id: TicketId,
}

impl ApiRequest {
    /// Joins the base endpoint and ticket identifier.
    pub fn new(base_url: &str, ticket_id: TicketId) -> Self {
        Self {
            target_url: format!("{}/{}", base_url.trim_end_matches('/'), ticket_id),
            ticket_id,
        }
    }
}
