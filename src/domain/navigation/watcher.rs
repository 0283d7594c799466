//! Navigation watcher - decides when a page should run the pipeline.
//!
//! The watcher is pure: it never sleeps or sends anything. It returns
//! [`ScheduledTrigger`]s that the caller honours by waiting the settle delay
//! and then calling [`NavigationWatcher::settle_elapsed`].

use tracing::debug;

use super::state::NavigationState;
use crate::domain::foundation::StateMachine;
use crate::domain::ticket::{extract_ticket_id, TicketId};

/// Which settle delay applies to a scheduled trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleDelay {
    /// After the initial page load.
    Initial,
    /// After a single-page-app address change (longer).
    Navigation,
}

/// Instruction to fire the pipeline for a ticket once the delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTrigger {
    pub ticket_id: TicketId,
    pub delay: SettleDelay,
}

/// State machine tracking the page address and the last triggered ticket.
#[derive(Debug, Clone, Default)]
pub struct NavigationWatcher {
    state: NavigationState,
    last_address: Option<String>,
    /// Ticket shown at the current address; `None` off ticket pages.
    current_ticket: Option<TicketId>,
    last_triggered: Option<TicketId>,
}

impl NavigationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn last_triggered(&self) -> Option<&TicketId> {
        self.last_triggered.as_ref()
    }

    pub fn current_address(&self) -> Option<&str> {
        self.last_address.as_deref()
    }

    pub fn current_ticket(&self) -> Option<&TicketId> {
        self.current_ticket.as_ref()
    }

    /// Returns true if results for this ticket should still be shown.
    ///
    /// The ticket must be both the one the state refers to and the one at
    /// the current address.
    pub fn is_current(&self, ticket_id: &TicketId) -> bool {
        self.state.ticket_id() == Some(ticket_id) && self.current_ticket.as_ref() == Some(ticket_id)
    }

    /// Initial page load finished.
    pub fn page_loaded(&mut self, address: &str) -> Option<ScheduledTrigger> {
        self.visit(address);
        let ticket_id = self.current_ticket.clone()?;
        self.schedule(ticket_id, SettleDelay::Initial)
    }

    /// The page address changed without a full reload.
    pub fn address_changed(&mut self, address: &str) -> Option<ScheduledTrigger> {
        if self.last_address.as_deref() == Some(address) {
            return None;
        }
        self.visit(address);

        let ticket_id = self.current_ticket.clone()?;
        if self.last_triggered.as_ref() == Some(&ticket_id) {
            debug!(ticket_id = %ticket_id, "Ticket already triggered, suppressing");
            if matches!(self.state, NavigationState::Pending(_)) {
                // Back on the ticket already shown; the pending one is abandoned.
                self.state = NavigationState::Triggered(ticket_id);
            }
            return None;
        }
        if matches!(&self.state, NavigationState::Pending(pending) if *pending == ticket_id) {
            return None;
        }
        self.schedule(ticket_id, SettleDelay::Navigation)
    }

    /// A scheduled settle delay ran out.
    ///
    /// Returns the ticket to run the pipeline for, or `None` if the trigger
    /// was superseded by later navigation or already ran.
    pub fn settle_elapsed(&mut self, ticket_id: &TicketId) -> Option<TicketId> {
        let still_pending =
            matches!(&self.state, NavigationState::Pending(pending) if pending == ticket_id);
        if !still_pending || self.current_ticket.as_ref() != Some(ticket_id) {
            debug!(ticket_id = %ticket_id, state = ?self.state, "Dropping stale settle timer");
            return None;
        }
        self.state = self
            .state
            .transition_to(NavigationState::Triggered(ticket_id.clone()))
            .ok()?;
        self.last_triggered = Some(ticket_id.clone());
        Some(ticket_id.clone())
    }

    /// Manual trigger: no settle delay, no same-ticket suppression.
    pub fn manual_trigger(&mut self, ticket_id: TicketId) -> TicketId {
        // Overrides a pending settle for another ticket, so the transition
        // table is not consulted.
        self.state = NavigationState::Triggered(ticket_id.clone());
        self.current_ticket = Some(ticket_id.clone());
        self.last_triggered = Some(ticket_id.clone());
        ticket_id
    }

    fn visit(&mut self, address: &str) {
        self.last_address = Some(address.to_string());
        self.current_ticket = extract_ticket_id(address);
        if self.current_ticket.is_none() && matches!(self.state, NavigationState::Pending(_)) {
            // Left ticket pages before the settle delay ran out.
            self.state = match self.last_triggered.clone() {
                Some(shown) => NavigationState::Triggered(shown),
                None => NavigationState::Idle,
            };
        }
    }

    fn schedule(&mut self, ticket_id: TicketId, delay: SettleDelay) -> Option<ScheduledTrigger> {
        let next = NavigationState::Pending(ticket_id.clone());
        self.state = self.state.transition_to(next).ok()?;
        Some(ScheduledTrigger { ticket_id, delay })
    }
}
