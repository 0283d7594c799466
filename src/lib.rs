//! Ticket Bridge - authenticated ticket-details pipeline for help-desk pages
//!
//! Three isolated contexts cooperate through typed messages: a page agent
//! watching the ticket page, a background coordinator that owns the session
//! credential and makes the single authenticated call, and a control panel.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
