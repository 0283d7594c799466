//! Ticket module - identifiers, page context and the ticket details call.

mod context;
mod request;
mod response;
mod ticket_id;

pub use context::{extract_ticket_id, TicketContext};
pub use request::ApiRequest;
pub use response::{ApiResponse, FailureKind, TROUBLESHOOTING_HINT};
pub use ticket_id::TicketId;
