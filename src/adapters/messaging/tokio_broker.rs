//! Tokio message broker between isolated contexts.
//!
//! Each context owns one end of a channel:
//! - the sender wraps a bounded `mpsc` queue and waits on a per-request
//!   `oneshot` for the reply
//! - the receiver dispatches each message to the handler registered for its
//!   tag on its own task, so requests never wait on each other and may
//!   complete out of order
//!
//! If the receiving side is shut down (or dropped) before replying, the
//! reply `oneshot` is dropped and the sender sees
//! [`ChannelError::ChannelClosed`].
//!
//! # Example
//!
//! ```ignore
//! let (sender, receiver) = channel("coordinator", 32);
//! let handle = receiver.serve(
//!     MessageRouter::new().with_handler(MessageTag::MakeApiCall, coordinator),
//! );
//!
//! let reply = sender.send(message).await?;
//! handle.shutdown();
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::domain::messaging::{ChannelError, Message, MessageTag, Reply};
use crate::ports::{MessageChannel, MessageHandler};

struct Envelope {
    message: Message,
    reply_to: oneshot::Sender<Result<Reply, ChannelError>>,
}

/// Creates a channel into the named receiving context.
pub fn channel(context: &'static str, capacity: usize) -> (MessageSender, MessageReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        MessageSender { tx, context },
        MessageReceiver { rx, context },
    )
}

/// Sending end; cheap to clone and share between tasks.
#[derive(Clone)]
pub struct MessageSender {
    tx: mpsc::Sender<Envelope>,
    context: &'static str,
}

#[async_trait]
impl MessageChannel for MessageSender {
    async fn send(&self, message: Message) -> Result<Reply, ChannelError> {
        let tag = message.tag();
        let (reply_to, reply) = oneshot::channel();

        self.tx
            .send(Envelope { message, reply_to })
            .await
            .map_err(|_| ChannelError::ChannelClosed)?;
        debug!(context = self.context, tag = %tag, "Message sent");

        reply.await.map_err(|_| ChannelError::ChannelClosed)?
    }
}

/// Handler table, one handler per message tag.
#[derive(Default, Clone)]
pub struct MessageRouter {
    handlers: HashMap<MessageTag, Arc<dyn MessageHandler>>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for a tag, replacing any earlier one.
    pub fn with_handler(mut self, tag: MessageTag, handler: Arc<dyn MessageHandler>) -> Self {
        if let Some(previous) = self.handlers.insert(tag, handler) {
            warn!(tag = %tag, replaced = previous.name(), "Replacing message handler");
        }
        self
    }

    fn handler_for(&self, tag: MessageTag) -> Option<Arc<dyn MessageHandler>> {
        self.handlers.get(&tag).cloned()
    }
}

/// Receiving end; turned into a running dispatcher by [`serve`](Self::serve).
pub struct MessageReceiver {
    rx: mpsc::Receiver<Envelope>,
    context: &'static str,
}

impl MessageReceiver {
    /// Starts dispatching messages to the router's handlers.
    pub fn serve(self, router: MessageRouter) -> ReceiverHandle {
        let MessageReceiver { mut rx, context } = self;

        let task = tokio::spawn(async move {
            let mut in_flight = JoinSet::new();
            loop {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(envelope) => dispatch(context, &router, envelope, &mut in_flight),
                        None => break,
                    },
                    Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                }
            }
            while in_flight.join_next().await.is_some() {}
            debug!(context, "All senders gone, receiver stopped");
        });

        ReceiverHandle { context, task }
    }
}

fn dispatch(
    context: &'static str,
    router: &MessageRouter,
    envelope: Envelope,
    in_flight: &mut JoinSet<()>,
) {
    let tag = envelope.message.tag();
    let Some(handler) = router.handler_for(tag) else {
        warn!(context, tag = %tag, "No handler registered");
        let _ = envelope.reply_to.send(Err(ChannelError::NoHandler(tag)));
        return;
    };

    in_flight.spawn(async move {
        let reply = handler.handle(envelope.message).await;
        if envelope.reply_to.send(Ok(reply)).is_err() {
            debug!(context, tag = %tag, handler = handler.name(), "Sender went away before reply");
        }
    });
}

/// Running receiver. Shutting it down tears the context down: pending
/// requests are abandoned and their senders see `ChannelClosed`.
pub struct ReceiverHandle {
    context: &'static str,
    task: JoinHandle<()>,
}

impl ReceiverHandle {
    /// Tears the receiving context down immediately.
    pub fn shutdown(self) {
        debug!(context = self.context, "Shutting receiver down");
        self.task.abort();
    }

    /// Waits until every sender is dropped and in-flight requests finish.
    pub async fn closed(self) {
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messaging::ManualInvokeReply;
    use crate::domain::ticket::{ApiResponse, TicketId};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn ticket(id: &str) -> TicketId {
        TicketId::new(id).unwrap()
    }

    fn make_call(id: &str) -> Message {
        Message::MakeApiCall {
            ticket_id: ticket(id),
            target_url: format!("https://api/ticket/details/{}", id),
        }
    }

    /// Echoes the ticket id back; ticket "1" waits for a gate first.
    struct GatedEcho {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl MessageHandler for GatedEcho {
        fn name(&self) -> &'static str {
            "gated_echo"
        }

        async fn handle(&self, message: Message) -> Reply {
            let Message::MakeApiCall { ticket_id, .. } = message else {
                return Reply::ManualInvoke(ManualInvokeReply::Error {
                    message: "unexpected".to_string(),
                });
            };
            if ticket_id.as_str() == "1" {
                self.gate.notified().await;
            }
            Reply::ApiResult(ApiResponse::success(json!({ "ticketId": ticket_id })))
        }
    }

    struct NeverReplies;

    #[async_trait]
    impl MessageHandler for NeverReplies {
        fn name(&self) -> &'static str {
            "never_replies"
        }

        async fn handle(&self, _message: Message) -> Reply {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn replies_reach_the_sender() {
        let (sender, receiver) = channel("test", 4);
        let _handle = receiver.serve(MessageRouter::new().with_handler(
            MessageTag::MakeApiCall,
            Arc::new(GatedEcho { gate: Arc::new(Notify::new()) }),
        ));

        let reply = sender.send(make_call("2")).await.unwrap();
        assert_eq!(
            reply,
            Reply::ApiResult(ApiResponse::success(json!({ "ticketId": "2" })))
        );
    }

    #[tokio::test]
    async fn requests_are_handled_concurrently_and_complete_out_of_order() {
        let gate = Arc::new(Notify::new());
        let (sender, receiver) = channel("test", 4);
        let _handle = receiver.serve(
            MessageRouter::new()
                .with_handler(MessageTag::MakeApiCall, Arc::new(GatedEcho { gate: gate.clone() })),
        );

        let slow_sender = sender.clone();
        let slow = tokio::spawn(async move { slow_sender.send(make_call("1")).await });
        tokio::task::yield_now().await;

        // The second request completes while the first is still blocked.
        let fast = tokio::time::timeout(Duration::from_secs(5), sender.send(make_call("2")))
            .await
            .expect("second request must not wait for the first")
            .unwrap();
        assert_eq!(
            fast,
            Reply::ApiResult(ApiResponse::success(json!({ "ticketId": "2" })))
        );
        assert!(!slow.is_finished());

        gate.notify_one();
        let slow = slow.await.unwrap().unwrap();
        assert_eq!(
            slow,
            Reply::ApiResult(ApiResponse::success(json!({ "ticketId": "1" })))
        );
    }

    #[tokio::test]
    async fn unregistered_tag_reports_no_handler() {
        let (sender, receiver) = channel("test", 4);
        let _handle = receiver.serve(MessageRouter::new());

        let result = sender.send(Message::ManualInvoke { ticket_id: None }).await;
        assert_eq!(result, Err(ChannelError::NoHandler(MessageTag::ManualInvoke)));
    }

    #[tokio::test]
    async fn shutdown_mid_request_reports_channel_closed() {
        let (sender, receiver) = channel("test", 4);
        let handle = receiver
            .serve(MessageRouter::new().with_handler(MessageTag::MakeApiCall, Arc::new(NeverReplies)));

        let pending = tokio::spawn(async move { sender.send(make_call("3")).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.shutdown();

        let result = pending.await.unwrap();
        assert_eq!(result, Err(ChannelError::ChannelClosed));
    }

    #[tokio::test]
    async fn dropped_receiver_reports_channel_closed() {
        let (sender, receiver) = channel("test", 4);
        drop(receiver);

        let result = sender.send(make_call("4")).await;
        assert_eq!(result, Err(ChannelError::ChannelClosed));
    }

    #[tokio::test]
    async fn receiver_stops_once_all_senders_are_dropped() {
        let (sender, receiver) = channel("test", 4);
        let handle = receiver.serve(MessageRouter::new());
        drop(sender);

        tokio::time::timeout(Duration::from_secs(5), handle.closed())
            .await
            .expect("receiver should stop");
    }
}
