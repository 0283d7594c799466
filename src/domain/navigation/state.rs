//! Navigation lifecycle states.

use crate::domain::foundation::StateMachine;
use crate::domain::ticket::TicketId;

/// Where the page agent is in deciding whether to run the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationState {
    /// No qualifying ticket page seen yet.
    #[default]
    Idle,
    /// A ticket page was seen; waiting for the host page to settle.
    Pending(TicketId),
    /// The pipeline was started for this ticket.
    Triggered(TicketId),
}

impl NavigationState {
    /// Ticket the state refers to, if any.
    pub fn ticket_id(&self) -> Option<&TicketId> {
        match self {
            NavigationState::Idle => None,
            NavigationState::Pending(id) | NavigationState::Triggered(id) => Some(id),
        }
    }
}

impl StateMachine for NavigationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use NavigationState::*;
        match (self, target) {
            (Idle, Pending(_)) => true,
            (Pending(_), Pending(_)) => true,
            (Triggered(_), Pending(_)) => true,
            (Pending(pending), Triggered(triggered)) => pending == triggered,
            // Manual triggers may start from anywhere.
            (Idle, Triggered(_)) | (Triggered(_), Triggered(_)) => true,
            _ => false,
        }
    }
}
