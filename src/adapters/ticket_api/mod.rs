//! Ticket API adapters - implementations of the `ApiInvoker` port.

mod reqwest_invoker;

pub use reqwest_invoker::{ReqwestApiInvoker, ReqwestInvokerConfig};
