//! ControlPanel - user-facing status, manual invoke and connection test.

use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::settings::{Settings, SettingsRepository};
use crate::domain::messaging::{ManualInvokeReply, Message, Reply};
use crate::domain::ticket::{TicketContext, TicketId};
use crate::ports::{ApiInvoker, MessageChannel, StorageError};

/// Ticket used to probe the endpoint from the connection test.
pub const PROBE_TICKET_ID: &str = "120349000058009045";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("Not on a ticket page")]
    NotOnTicketPage,

    #[error("Failed to communicate with page")]
    PageUnreachable,

    #[error("{0}")]
    Rejected(String),
}

/// Result of [`ControlPanel::test_connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Reachable,
    UnexpectedStatus(u16),
    Unreachable(String),
}

impl ConnectionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ConnectionStatus::Reachable)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Reachable => write!(f, "Connection successful!"),
            ConnectionStatus::UnexpectedStatus(status) => {
                write!(f, "API returned status: {}", status)
            }
            ConnectionStatus::Unreachable(reason) => write!(f, "Connection failed: {}", reason),
        }
    }
}

pub struct ControlPanel {
    page: Arc<dyn MessageChannel>,
    settings: Arc<SettingsRepository>,
    invoker: Arc<dyn ApiInvoker>,
    desk_host: String,
}

impl ControlPanel {
    pub fn new(
        page: Arc<dyn MessageChannel>,
        settings: Arc<SettingsRepository>,
        invoker: Arc<dyn ApiInvoker>,
        desk_host: impl Into<String>,
    ) -> Self {
        Self {
            page,
            settings,
            invoker,
            desk_host: desk_host.into(),
        }
    }

    /// Ticket shown for the active tab, if it is a help-desk ticket page.
    pub fn current_ticket(&self, active_url: &str) -> Option<TicketId> {
        let url = Url::parse(active_url).ok()?;
        let on_desk = url
            .host_str()
            .map(|host| host.eq_ignore_ascii_case(&self.desk_host))
            .unwrap_or(false);
        if !on_desk {
            return None;
        }
        TicketContext::from_address(active_url).map(|context| context.ticket_id)
    }

    /// Asks the page showing `active_url` to run the pipeline now.
    pub async fn invoke(&self, active_url: &str) -> Result<TicketId, PanelError> {
        let ticket_id = self
            .current_ticket(active_url)
            .ok_or(PanelError::NotOnTicketPage)?;

        let reply = self
            .page
            .send(Message::ManualInvoke {
                ticket_id: Some(ticket_id),
            })
            .await;
        match reply {
            Ok(Reply::ManualInvoke(ManualInvokeReply::Invoked { ticket_id })) => {
                info!(ticket_id = %ticket_id, "Manual invoke accepted by page");
                Ok(ticket_id)
            }
            Ok(Reply::ManualInvoke(ManualInvokeReply::Error { message })) => {
                Err(PanelError::Rejected(message))
            }
            Ok(Reply::ApiResult(_)) => Err(PanelError::PageUnreachable),
            Err(e) => {
                warn!(error = %e, "Page did not answer manual invoke");
                Err(PanelError::PageUnreachable)
            }
        }
    }

    /// Probes the configured endpoint without credentials.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let endpoint = match self.settings.load().await {
            Ok(settings) => settings.api_endpoint,
            Err(e) => return ConnectionStatus::Unreachable(e.to_string()),
        };
        let url = format!("{}/{}", endpoint.trim_end_matches('/'), PROBE_TICKET_ID);

        match self.invoker.probe(&url).await {
            Ok(status) if (200..300).contains(&status) => ConnectionStatus::Reachable,
            Ok(status) => ConnectionStatus::UnexpectedStatus(status),
            Err(reason) => ConnectionStatus::Unreachable(reason),
        }
    }

    pub async fn load_settings(&self) -> Result<Settings, StorageError> {
        self.settings.load().await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        self.settings.save(settings).await?;
        info!(endpoint = %settings.api_endpoint, "Settings saved");
        Ok(())
    }
}
