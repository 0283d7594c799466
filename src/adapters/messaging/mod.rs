//! Messaging adapters - the in-process cross-context broker.

mod tokio_broker;

pub use tokio_broker::{channel, MessageReceiver, MessageRouter, MessageSender, ReceiverHandle};
