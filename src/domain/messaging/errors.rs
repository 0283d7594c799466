//! Transport-level broker errors.

use thiserror::Error;

use super::message::MessageTag;

/// Failures of the channel itself, as opposed to application failures
/// carried inside a [`Reply`](super::Reply).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("Receiving context closed before replying")]
    ChannelClosed,

    #[error("No handler registered for '{0}'")]
    NoHandler(MessageTag),

    #[error("Unexpected reply for '{0}'")]
    UnexpectedReply(MessageTag),
}
