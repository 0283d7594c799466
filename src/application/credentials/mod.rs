//! Credential acquisition - passive capture and tiered resolution.

mod credential_observer;
mod credential_store;

pub use credential_observer::CredentialObserver;
pub use credential_store::{CredentialStore, ResolvedCredential, CAPTURED_AT_KEY, CREDENTIAL_KEY};
