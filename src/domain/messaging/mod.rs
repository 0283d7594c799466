//! Messaging module - the typed protocol between isolated contexts.

mod errors;
mod message;

pub use errors::ChannelError;
pub use message::{ManualInvokeReply, Message, MessageTag, Reply};
