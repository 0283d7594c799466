//! BackgroundCoordinator - performs the authenticated call on behalf of pages.
//!
//! Page contexts cannot read the session cookie, so they send `MakeApiCall`
//! here. The coordinator resolves a credential, performs the single read
//! call and replies with a normalized [`ApiResponse`]. Concurrent requests
//! are independent; each resolves its own credential.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::credentials::CredentialStore;
use crate::domain::messaging::{ManualInvokeReply, Message, Reply};
use crate::domain::ticket::{ApiRequest, ApiResponse, FailureKind, TicketId};
use crate::ports::{ApiInvoker, MessageHandler};

pub struct BackgroundCoordinator {
    store: Arc<CredentialStore>,
    invoker: Arc<dyn ApiInvoker>,
}

impl BackgroundCoordinator {
    pub fn new(store: Arc<CredentialStore>, invoker: Arc<dyn ApiInvoker>) -> Self {
        Self { store, invoker }
    }

    /// Resolves a credential and calls `target_url` with it.
    pub async fn make_api_call(&self, ticket_id: TicketId, target_url: String) -> ApiResponse {
        let resolved = match self.store.resolve().await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(ticket_id = %ticket_id, "No credential available for ticket call");
                return ApiResponse::failure(FailureKind::NoCredentialAvailable, e.to_string());
            }
        };

        info!(
            ticket_id = %ticket_id,
            tier = %resolved.tier(),
            length = resolved.credential.len(),
            "Calling ticket details endpoint"
        );
        let request = ApiRequest {
            target_url,
            ticket_id,
        };
        let response = self.invoker.invoke(&resolved.credential, &request).await;
        if let Some(kind) = response.failure_kind() {
            warn!(ticket_id = %request.ticket_id, %kind, "Ticket details call failed");
        }
        response
    }
}

#[async_trait]
impl MessageHandler for BackgroundCoordinator {
    fn name(&self) -> &'static str {
        "background_coordinator"
    }

    async fn handle(&self, message: Message) -> Reply {
        match message {
            Message::MakeApiCall {
                ticket_id,
                target_url,
            } => Reply::ApiResult(self.make_api_call(ticket_id, target_url).await),
            Message::ManualInvoke { .. } => Reply::ManualInvoke(ManualInvokeReply::Error {
                message: "Manual invoke is handled by the page".to_string(),
            }),
        }
    }
}
