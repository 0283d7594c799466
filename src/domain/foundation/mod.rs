//! Foundation module - Shared domain primitives.
//!
//! Contains value objects and error types that the rest of the domain
//! builds on.

mod errors;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
