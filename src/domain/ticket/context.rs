//! Ticket context extraction from page addresses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ticket_id::TicketId;

static TICKET_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"details/(\d+)").expect("ticket address pattern is valid"));

/// Extracts the ticket identifier from a page address.
///
/// Returns `None` when the address has no `details/<digits>` segment, which
/// means the page does not qualify for the overlay.
pub fn extract_ticket_id(address: &str) -> Option<TicketId> {
    TICKET_ADDRESS
        .captures(address)
        .and_then(|caps| caps.get(1))
        .and_then(|m| TicketId::new(m.as_str()).ok())
}

/// The ticket a page is showing, derived purely from its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketContext {
    pub ticket_id: TicketId,
    pub source_url: String,
}

impl TicketContext {
    /// Builds the context for an address, if it is a ticket page.
    pub fn from_address(address: &str) -> Option<Self> {
        extract_ticket_id(address).map(|ticket_id| Self {
            ticket_id,
            source_url: address.to_string(),
        })
    }
}
