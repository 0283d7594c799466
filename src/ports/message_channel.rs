//! Cross-context messaging ports.
//!
//! The sending side only sees [`MessageChannel`]; the receiving side
//! registers one [`MessageHandler`] per message tag. Handlers may do
//! asynchronous work and several may run at once.

use async_trait::async_trait;

use crate::domain::messaging::{ChannelError, Message, Reply};

/// Sender half of a cross-context channel.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Sends a message and waits for its single reply.
    ///
    /// Fails with [`ChannelError::ChannelClosed`] if the receiving context is
    /// torn down before replying.
    async fn send(&self, message: Message) -> Result<Reply, ChannelError>;
}

/// Receiver-side handler for one message tag.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handler name for logging.
    fn name(&self) -> &'static str;

    /// Handles a message and produces its reply.
    async fn handle(&self, message: Message) -> Reply;
}
