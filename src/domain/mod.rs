//! Domain layer - pure types and rules, free of I/O.
//!
//! - `foundation` - timestamps, validation errors, the state machine trait
//! - `credential` - credentials, tiers, thresholds, cookie merging, origin patterns
//! - `ticket` - ticket identifiers, address extraction, request and response
//! - `messaging` - the cross-context message protocol
//! - `navigation` - the navigation watcher state machine

pub mod credential;
pub mod foundation;
pub mod messaging;
pub mod navigation;
pub mod ticket;
