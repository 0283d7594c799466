//! ExtensionRuntime - wires the three contexts together.
//!
//! The background context owns credentials and the API invoker, the page
//! context owns navigation and rendering, and the control panel only talks
//! to the page. Contexts reach each other exclusively through broker
//! channels.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::control_panel::ControlPanel;
use super::coordinator::BackgroundCoordinator;
use super::credentials::{CredentialObserver, CredentialStore};
use super::page_agent::{ManualInvokeHandler, PageAgent, SettleDelays};
use super::settings::SettingsRepository;
use crate::adapters::{channel, MessageRouter, ReceiverHandle};
use crate::config::{AppConfig, NavigationConfig, ValidationError};
use crate::domain::messaging::MessageTag;
use crate::ports::{ApiInvoker, CookieJar, KeyValueStore, OverlayPresenter};

const CHANNEL_CAPACITY: usize = 32;

/// External collaborators supplied by the host.
pub struct RuntimeParts {
    /// Storage area for captured credentials.
    pub local_storage: Arc<dyn KeyValueStore>,
    /// Storage area for control-panel settings.
    pub sync_storage: Arc<dyn KeyValueStore>,
    pub cookie_jar: Arc<dyn CookieJar>,
    pub invoker: Arc<dyn ApiInvoker>,
    pub presenter: Arc<dyn OverlayPresenter>,
}

impl From<&NavigationConfig> for SettleDelays {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            initial: config.initial_settle(),
            navigation: config.navigation_settle(),
        }
    }
}

pub struct ExtensionRuntime {
    store: Arc<CredentialStore>,
    observer: CredentialObserver,
    coordinator: Arc<BackgroundCoordinator>,
    page_agent: Arc<PageAgent>,
    control_panel: ControlPanel,
    background: ReceiverHandle,
    page: ReceiverHandle,
    feed: JoinHandle<()>,
}

impl ExtensionRuntime {
    /// Builds every component and starts the background and page receivers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &AppConfig, parts: RuntimeParts) -> Result<Self, ValidationError> {
        let thresholds = config.credentials.thresholds();

        let store = Arc::new(CredentialStore::new(
            parts.local_storage,
            parts.cookie_jar,
            config.credentials.cookie_domain_list(),
            thresholds,
        ));
        let (observer, observations) =
            CredentialObserver::new(config.credentials.origin_patterns()?, thresholds);
        let feed = store.spawn_observation_feed(observations);

        let coordinator = Arc::new(BackgroundCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&parts.invoker),
        ));
        let (to_background, background_rx) = channel("background", CHANNEL_CAPACITY);
        let background = background_rx.serve(
            MessageRouter::new().with_handler(MessageTag::MakeApiCall, coordinator.clone()),
        );

        let settings = Arc::new(SettingsRepository::new(
            parts.sync_storage,
            config.api.base_url.clone(),
        ));
        let page_agent = Arc::new(PageAgent::new(
            Arc::new(to_background),
            Arc::clone(&settings),
            parts.presenter,
            SettleDelays::from(&config.navigation),
        ));
        let (to_page, page_rx) = channel("page", CHANNEL_CAPACITY);
        let page = page_rx.serve(MessageRouter::new().with_handler(
            MessageTag::ManualInvoke,
            Arc::new(ManualInvokeHandler::new(Arc::clone(&page_agent))),
        ));

        let control_panel = ControlPanel::new(
            Arc::new(to_page),
            settings,
            parts.invoker,
            config.api.desk_host.clone(),
        );

        info!(
            endpoint = %config.api.base_url,
            cookie_domains = %config.credentials.cookie_domains,
            "Runtime started"
        );
        Ok(Self {
            store,
            observer,
            coordinator,
            page_agent,
            control_panel,
            background,
            page,
            feed,
        })
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn observer(&self) -> &CredentialObserver {
        &self.observer
    }

    pub fn coordinator(&self) -> &Arc<BackgroundCoordinator> {
        &self.coordinator
    }

    pub fn page_agent(&self) -> &Arc<PageAgent> {
        &self.page_agent
    }

    pub fn control_panel(&self) -> &ControlPanel {
        &self.control_panel
    }

    /// Tears down every context. Outstanding requests see `ChannelClosed`.
    ///
    /// Observations already captured are persisted first. Clones of the
    /// observer handed out earlier must be dropped, or this waits for them.
    pub async fn shutdown(self) {
        let Self {
            observer,
            feed,
            page,
            background,
            ..
        } = self;

        drop(observer);
        if let Err(e) = feed.await {
            warn!(error = %e, "Credential feed task failed");
        }
        page.shutdown();
        background.shutdown();
        info!("Runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCookieJar, InMemoryKeyValueStore, TracingPresenter};
    use crate::domain::credential::Credential;
    use crate::domain::ticket::{ApiRequest, ApiResponse};
    use async_trait::async_trait;
    use http::HeaderMap;
    use reqwest::Url;
    use serde_json::json;
    use std::time::Duration;

    struct EchoInvoker;

    #[async_trait]
    impl ApiInvoker for EchoInvoker {
        async fn invoke(&self, credential: &Credential, request: &ApiRequest) -> ApiResponse {
            ApiResponse::success(json!({
                "ticket": request.ticket_id.as_str(),
                "credentialLength": credential.len(),
            }))
        }

        async fn probe(&self, _url: &str) -> Result<u16, String> {
            Ok(200)
        }
    }

    fn parts() -> RuntimeParts {
        RuntimeParts {
            local_storage: Arc::new(InMemoryKeyValueStore::new()),
            sync_storage: Arc::new(InMemoryKeyValueStore::new()),
            cookie_jar: Arc::new(InMemoryCookieJar::new()),
            invoker: Arc::new(EchoInvoker),
            presenter: Arc::new(TracingPresenter),
        }
    }

    #[tokio::test]
    async fn observed_credential_reaches_the_store() {
        let runtime = ExtensionRuntime::start(&AppConfig::default(), parts()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("cookie", "z".repeat(140).parse().unwrap());

        runtime
            .observer()
            .inspect(&Url::parse("https://desk.zoho.in/api/v1/me").unwrap(), headers);

        let mut captured = None;
        for _ in 0..50 {
            captured = runtime.store().current().await;
            if captured.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(captured.unwrap().len(), 140);
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn control_panel_manual_invoke_reaches_page_agent() {
        let runtime = ExtensionRuntime::start(&AppConfig::default(), parts()).unwrap();
        runtime
            .store()
            .record_observation(Credential::new(
                "z".repeat(120),
                crate::domain::credential::CredentialTier::Memory,
            ))
            .await;

        let ticket = runtime
            .control_panel()
            .invoke("https://desk.zoho.in/agent/tickets/details/120349000058009045")
            .await
            .unwrap();

        assert_eq!(ticket.as_str(), "120349000058009045");
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_persists_pending_observations() {
        let local = Arc::new(InMemoryKeyValueStore::new());
        let runtime = ExtensionRuntime::start(
            &AppConfig::default(),
            RuntimeParts {
                local_storage: local.clone(),
                ..parts()
            },
        )
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("cookie", "y".repeat(90).parse().unwrap());
        runtime
            .observer()
            .inspect(&Url::parse("https://desk.zoho.in/").unwrap(), headers);

        runtime.shutdown().await;

        let snapshot = local.snapshot().await;
        assert_eq!(
            snapshot[crate::application::credentials::CREDENTIAL_KEY],
            json!("y".repeat(90))
        );
    }

    #[tokio::test]
    async fn invalid_origin_configuration_is_rejected() {
        let mut config = AppConfig::default();
        config.credentials.target_origins = "not-a-pattern".to_string();

        assert!(ExtensionRuntime::start(&config, parts()).is_err());
    }
}
