//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the pipeline to external systems:
//! - `storage` - durable key-value storage (in-memory, JSON file)
//! - `cookies` - cookie jars (in-memory, Netscape `cookies.txt`)
//! - `ticket_api` - the reqwest ticket details invoker
//! - `messaging` - the tokio cross-context broker
//! - `presentation` - overlay presenters (tracing, stdout)

pub mod cookies;
pub mod messaging;
pub mod presentation;
pub mod storage;
pub mod ticket_api;

pub use cookies::{InMemoryCookieJar, NetscapeCookieJar};
pub use messaging::{channel, MessageReceiver, MessageRouter, MessageSender, ReceiverHandle};
pub use presentation::{StdoutPresenter, TracingPresenter};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use ticket_api::{ReqwestApiInvoker, ReqwestInvokerConfig};
