//! PageAgent - runs the pipeline for the ticket page it is attached to.
//!
//! Drives the [`NavigationWatcher`] from page events, waits out settle delays
//! on the tokio clock, asks the background context to make the call and
//! hands the outcome to the overlay presenter. Outcomes for a ticket the page
//! has since navigated away from are discarded.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::settings::SettingsRepository;
use crate::domain::messaging::{ChannelError, ManualInvokeReply, Message, Reply};
use crate::domain::navigation::{NavigationWatcher, ScheduledTrigger, SettleDelay};
use crate::domain::ticket::{
    extract_ticket_id, ApiRequest, ApiResponse, FailureKind, TicketId,
};
use crate::ports::{MessageChannel, MessageHandler, OverlayPresenter, OverlayView, PipelineEvent};

pub const NO_TICKET_MESSAGE: &str = "No ticket ID found in current URL";

/// Concrete durations for each [`SettleDelay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    pub initial: Duration,
    pub navigation: Duration,
}

impl SettleDelays {
    pub fn duration(&self, delay: SettleDelay) -> Duration {
        match delay {
            SettleDelay::Initial => self.initial,
            SettleDelay::Navigation => self.navigation,
        }
    }
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(1500),
            navigation: Duration::from_millis(2000),
        }
    }
}

pub struct PageAgent {
    watcher: Mutex<NavigationWatcher>,
    background: Arc<dyn MessageChannel>,
    settings: Arc<SettingsRepository>,
    presenter: Arc<dyn OverlayPresenter>,
    delays: SettleDelays,
}

impl PageAgent {
    pub fn new(
        background: Arc<dyn MessageChannel>,
        settings: Arc<SettingsRepository>,
        presenter: Arc<dyn OverlayPresenter>,
        delays: SettleDelays,
    ) -> Self {
        Self {
            watcher: Mutex::new(NavigationWatcher::new()),
            background,
            settings,
            presenter,
            delays,
        }
    }

    /// Address the page is currently showing.
    pub async fn current_address(&self) -> Option<String> {
        self.watcher.lock().await.current_address().map(str::to_string)
    }

    /// Initial page load. Returns the settle timer task if one was scheduled.
    pub async fn page_loaded(self: &Arc<Self>, address: &str) -> Option<JoinHandle<()>> {
        let trigger = self.watcher.lock().await.page_loaded(address)?;
        Some(self.schedule(trigger))
    }

    /// In-page navigation. Returns the settle timer task if one was scheduled.
    pub async fn address_changed(self: &Arc<Self>, address: &str) -> Option<JoinHandle<()>> {
        let trigger = self.watcher.lock().await.address_changed(address)?;
        Some(self.schedule(trigger))
    }

    /// Picks the ticket for a manual run and marks it triggered.
    ///
    /// Uses `requested` when given, otherwise the ticket in the current
    /// address. Returns `None` when neither is available.
    pub async fn begin_manual(&self, requested: Option<TicketId>) -> Option<TicketId> {
        let mut watcher = self.watcher.lock().await;
        let ticket_id = requested.or_else(|| watcher.current_address().and_then(extract_ticket_id))?;
        Some(watcher.manual_trigger(ticket_id))
    }

    /// Runs the pipeline for a ticket and renders the outcome.
    ///
    /// Returns `None` when the page moved on to another ticket while the call
    /// was in flight; the outcome is then dropped without rendering.
    pub async fn run_pipeline(&self, ticket_id: TicketId) -> Option<ApiResponse> {
        info!(ticket_id = %ticket_id, "Running ticket pipeline");
        self.presenter.lifecycle(PipelineEvent::Started {
            ticket_id: ticket_id.clone(),
        });

        let endpoint = self.endpoint().await;
        let request = ApiRequest::new(&endpoint, ticket_id.clone());
        let message = Message::MakeApiCall {
            ticket_id: request.ticket_id.clone(),
            target_url: request.target_url,
        };
        let response = match self.background.send(message).await {
            Ok(Reply::ApiResult(response)) => response,
            Ok(other) => {
                warn!(?other, "Unexpected reply to makeAPICall");
                ApiResponse::failure(FailureKind::ChannelClosed, "Unexpected reply from background")
            }
            Err(e) => channel_failure(e),
        };

        if !self.watcher.lock().await.is_current(&ticket_id) {
            debug!(ticket_id = %ticket_id, "Discarding result for stale ticket");
            return None;
        }

        match &response {
            ApiResponse::Success { data } => {
                self.presenter.lifecycle(PipelineEvent::Succeeded {
                    ticket_id: ticket_id.clone(),
                });
                self.presenter.render(OverlayView::Details {
                    ticket_id,
                    data: data.clone(),
                });
            }
            ApiResponse::Failure { message, .. } => {
                self.presenter.lifecycle(PipelineEvent::Failed {
                    ticket_id: ticket_id.clone(),
                    message: message.clone(),
                });
                self.presenter.render(OverlayView::error(ticket_id, message.clone()));
            }
        }
        Some(response)
    }

    fn schedule(self: &Arc<Self>, trigger: ScheduledTrigger) -> JoinHandle<()> {
        let delay = self.delays.duration(trigger.delay);
        debug!(ticket_id = %trigger.ticket_id, ?delay, "Scheduling pipeline after settle delay");

        let agent = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let ready = agent.watcher.lock().await.settle_elapsed(&trigger.ticket_id);
            if let Some(ticket_id) = ready {
                agent.run_pipeline(ticket_id).await;
            }
        })
    }

    async fn endpoint(&self) -> String {
        match self.settings.load().await {
            Ok(settings) => settings.api_endpoint,
            Err(e) => {
                warn!(error = %e, "Settings unreadable, using default endpoint");
                self.settings.default_endpoint().to_string()
            }
        }
    }
}

/// Maps a transport error to the failure shown on the overlay.
///
/// Every transport error is surfaced as `ChannelClosed`; routing mistakes are
/// logged as errors so they are not mistaken for a torn-down context.
fn channel_failure(e: ChannelError) -> ApiResponse {
    match &e {
        ChannelError::ChannelClosed => warn!("Background context closed before replying"),
        ChannelError::NoHandler(tag) | ChannelError::UnexpectedReply(tag) => {
            error!(%tag, error = %e, "Background routing failure")
        }
    }
    ApiResponse::failure(FailureKind::ChannelClosed, e.to_string())
}

/// Receiver-side handler for `manualInvoke` sent by the control panel.
///
/// Acknowledges immediately and runs the pipeline in the background.
pub struct ManualInvokeHandler {
    agent: Arc<PageAgent>,
}

impl ManualInvokeHandler {
    pub fn new(agent: Arc<PageAgent>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl MessageHandler for ManualInvokeHandler {
    fn name(&self) -> &'static str {
        "page_agent"
    }

    async fn handle(&self, message: Message) -> Reply {
        let requested = match message {
            Message::ManualInvoke { ticket_id } => ticket_id,
            Message::MakeApiCall { .. } => {
                return Reply::ApiResult(ApiResponse::failure(
                    FailureKind::ChannelClosed,
                    "Page context does not make API calls",
                ))
            }
        };

        let ticket_id = match self.agent.begin_manual(requested).await {
            Some(ticket_id) => ticket_id,
            None => {
                return Reply::ManualInvoke(ManualInvokeReply::Error {
                    message: NO_TICKET_MESSAGE.to_string(),
                })
            }
        };

        info!(ticket_id = %ticket_id, "Manual invoke");
        let agent = Arc::clone(&self.agent);
        let run = ticket_id.clone();
        tokio::spawn(async move {
            agent.run_pipeline(run).await;
        });
        Reply::ManualInvoke(ManualInvokeReply::Invoked { ticket_id })
    }
}
