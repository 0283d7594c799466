//! Navigation module - ticket page detection state machine.

mod state;
mod watcher;

pub use state::NavigationState;
pub use watcher::{NavigationWatcher, ScheduledTrigger, SettleDelay};
