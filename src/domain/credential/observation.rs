//! Events produced by the credential observer and consumed by the store.

use super::credential::{Credential, CredentialTier};

/// A credential header seen on an allow-listed outgoing request.
#[derive(Debug, Clone)]
pub struct CredentialObservation {
    /// URL of the request the header was taken from.
    pub request_url: String,
    pub credential: Credential,
}

impl CredentialObservation {
    pub fn new(request_url: impl Into<String>, header_value: impl Into<String>) -> Self {
        Self {
            request_url: request_url.into(),
            credential: Credential::new(header_value, CredentialTier::Memory),
        }
    }
}
