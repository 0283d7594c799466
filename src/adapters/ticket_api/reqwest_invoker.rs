//! Reqwest Invoker - Implementation of ApiInvoker over HTTP.
//!
//! Sends `GET <target>` with `accept: application/json`, the credential in a
//! custom header and a marker header identifying extension-originated calls.
//! Every outcome is classified:
//!
//! | outcome                  | result                          |
//! |--------------------------|---------------------------------|
//! | transport error          | `Failure { Network }`           |
//! | non-2xx status           | `Failure { Http, "<code> <reason>" }` |
//! | body is not JSON         | `Failure { Decode }`            |
//! | otherwise                | `Success { data }`              |
//!
//! There is no retry; the caller re-triggers the pipeline if it wants one.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::credential::Credential;
use crate::domain::ticket::{ApiRequest, ApiResponse, FailureKind};
use crate::ports::ApiInvoker;

/// Configuration for the reqwest invoker.
#[derive(Debug, Clone)]
pub struct ReqwestInvokerConfig {
    /// Header carrying the session credential.
    pub credential_header: String,
    /// Header marking the call as extension-originated.
    pub marker_header: String,
    /// Marker value on pipeline calls.
    pub marker_value: String,
    /// Marker value on connection probes.
    pub probe_marker_value: String,
    /// Transport timeout.
    pub timeout: Duration,
}

impl Default for ReqwestInvokerConfig {
    fn default() -> Self {
        Self {
            credential_header: "X-Zoho-Cookies".to_string(),
            marker_header: "X-Extension-Request".to_string(),
            marker_value: "true".to_string(),
            probe_marker_value: "popup-test".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ReqwestInvokerConfig {
    /// Sets the credential header name.
    pub fn with_credential_header(mut self, header: impl Into<String>) -> Self {
        self.credential_header = header.into();
        self
    }

    /// Sets the marker header name.
    pub fn with_marker_header(mut self, header: impl Into<String>) -> Self {
        self.marker_header = header.into();
        self
    }

    /// Sets the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Ticket details invoker using reqwest.
pub struct ReqwestApiInvoker {
    config: ReqwestInvokerConfig,
    client: Client,
}

impl ReqwestApiInvoker {
    /// Creates an invoker with its own HTTP client.
    pub fn new(config: ReqwestInvokerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn status_message(status: StatusCode) -> String {
        match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        }
    }

    fn transport_message(e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("Request timed out: {}", e)
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else if e.is_builder() {
            format!("Invalid request: {}", e)
        } else {
            e.to_string()
        }
    }
}

#[async_trait]
impl ApiInvoker for ReqwestApiInvoker {
    async fn invoke(&self, credential: &Credential, request: &ApiRequest) -> ApiResponse {
        debug!(
            ticket_id = %request.ticket_id,
            credential_len = credential.len(),
            "Calling ticket details endpoint"
        );

        let response = match self
            .client
            .get(&request.target_url)
            .header(ACCEPT, "application/json")
            .header(self.config.credential_header.as_str(), credential.expose())
            .header(self.config.marker_header.as_str(), self.config.marker_value.as_str())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(ticket_id = %request.ticket_id, error = %e, "Ticket details call failed");
                return ApiResponse::failure(FailureKind::Network, Self::transport_message(&e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(ticket_id = %request.ticket_id, status = status.as_u16(), "Ticket details call rejected");
            return ApiResponse::failure(FailureKind::Http, Self::status_message(status));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return ApiResponse::failure(FailureKind::Network, Self::transport_message(&e));
            }
        };

        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(data) => ApiResponse::success(data),
            Err(e) => ApiResponse::failure(
                FailureKind::Decode,
                format!("Invalid JSON in response body: {}", e),
            ),
        }
    }

    async fn probe(&self, url: &str) -> Result<u16, String> {
        self.client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(
                self.config.marker_header.as_str(),
                self.config.probe_marker_value.as_str(),
            )
            .send()
            .await
            .map(|response| response.status().as_u16())
            .map_err(|e| Self::transport_message(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential::CredentialTier;
    use crate::domain::ticket::TicketId;
    use axum::extract::Path;
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn echo_details(Path(id): Path<String>, headers: HeaderMap) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "ticketId": id,
            "cookies": header("x-zoho-cookies"),
            "marker": header("x-extension-request"),
            "accept": header("accept"),
        }))
    }

    fn router() -> Router {
        Router::new()
            .route("/ticket/details/:id", get(echo_details))
            .route("/broken/:id", get(|| async { "<html>not json</html>" }))
    }

    fn invoker() -> ReqwestApiInvoker {
        ReqwestApiInvoker::new(ReqwestInvokerConfig::default()).unwrap()
    }

    fn credential() -> Credential {
        Credential::new("session=abc; csrf=def", CredentialTier::Memory)
    }

    fn request(base: &str, id: &str) -> ApiRequest {
        ApiRequest::new(base, TicketId::new(id).unwrap())
    }

    #[test]
    fn config_builder_works() {
        let config = ReqwestInvokerConfig::default()
            .with_credential_header("X-Session")
            .with_marker_header("X-Origin")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.credential_header, "X-Session");
        assert_eq!(config.marker_header, "X-Origin");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.marker_value, "true");
    }

    #[test]
    fn status_message_includes_code_and_reason() {
        assert_eq!(
            ReqwestApiInvoker::status_message(StatusCode::NOT_FOUND),
            "404 Not Found"
        );
    }

    #[tokio::test]
    async fn success_returns_parsed_body_and_sends_headers() {
        let base = spawn_server(router()).await;

        let response = invoker()
            .invoke(&credential(), &request(&format!("{}/ticket/details", base), "120349000058009045"))
            .await;

        assert_eq!(
            response,
            ApiResponse::success(json!({
                "ticketId": "120349000058009045",
                "cookies": "session=abc; csrf=def",
                "marker": "true",
                "accept": "application/json",
            }))
        );
    }

    #[tokio::test]
    async fn non_success_status_is_http_failure() {
        let base = spawn_server(router()).await;

        let response = invoker()
            .invoke(&credential(), &request(&format!("{}/missing", base), "1"))
            .await;

        match response {
            ApiResponse::Failure { error_kind, message } => {
                assert_eq!(error_kind, FailureKind::Http);
                assert!(message.contains("404"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_decode_failure() {
        let base = spawn_server(router()).await;

        let response = invoker()
            .invoke(&credential(), &request(&format!("{}/broken", base), "1"))
            .await;

        assert_eq!(response.failure_kind(), Some(FailureKind::Decode));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let response = invoker()
            .invoke(&credential(), &request(&format!("http://{}/ticket/details", addr), "1"))
            .await;

        assert_eq!(response.failure_kind(), Some(FailureKind::Network));
    }

    #[tokio::test]
    async fn probe_reports_status_code() {
        let base = spawn_server(router()).await;

        let ok = invoker().probe(&format!("{}/ticket/details/1", base)).await;
        let missing = invoker().probe(&format!("{}/nothing", base)).await;

        assert_eq!(ok, Ok(200));
        assert_eq!(missing, Ok(404));
    }
}
