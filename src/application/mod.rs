//! Application layer - the pipeline components.
//!
//! Each component depends only on ports; [`ExtensionRuntime`] wires them to
//! concrete adapters and broker channels.

pub mod control_panel;
pub mod coordinator;
pub mod credentials;
pub mod page_agent;
pub mod runtime;
pub mod settings;

pub use control_panel::{ConnectionStatus, ControlPanel, PanelError, PROBE_TICKET_ID};
pub use coordinator::BackgroundCoordinator;
pub use credentials::{CredentialObserver, CredentialStore, ResolvedCredential};
pub use page_agent::{ManualInvokeHandler, PageAgent, SettleDelays, NO_TICKET_MESSAGE};
pub use runtime::{ExtensionRuntime, RuntimeParts};
pub use settings::{Settings, SettingsRepository};
