//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the pipeline and the outside world. Adapters implement these ports.
//!
//! - `KeyValueStore` - durable storage areas (credentials, settings)
//! - `CookieJar` - system cookie jar queries
//! - `ApiInvoker` - the authenticated ticket details call
//! - `MessageChannel` / `MessageHandler` - cross-context messaging
//! - `OverlayPresenter` - rendering and lifecycle notifications

mod api_invoker;
mod cookie_jar;
mod key_value_store;
mod message_channel;
mod overlay_presenter;

pub use api_invoker::ApiInvoker;
pub use cookie_jar::{CookieJar, CookieJarError};
pub use key_value_store::{KeyValueStore, StorageError, StorageRecord};
pub use message_channel::{MessageChannel, MessageHandler};
pub use overlay_presenter::{OverlayPresenter, OverlayView, PipelineEvent};
