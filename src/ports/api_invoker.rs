//! API invoker port - the one authenticated read call.

use async_trait::async_trait;

use crate::domain::credential::Credential;
use crate::domain::ticket::{ApiRequest, ApiResponse};

/// Port for performing the ticket details call.
///
/// Implementations never return errors: every outcome, including transport
/// failures, is classified into an [`ApiResponse`]. A single attempt is made.
#[async_trait]
pub trait ApiInvoker: Send + Sync {
    /// Performs `GET request.target_url` carrying the credential.
    async fn invoke(&self, credential: &Credential, request: &ApiRequest) -> ApiResponse;

    /// Unauthenticated reachability check. Returns the HTTP status code, or a
    /// description of the connection error.
    async fn probe(&self, url: &str) -> Result<u16, String>;
}
