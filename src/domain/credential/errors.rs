//! Credential resolution errors.

use thiserror::Error;

/// Errors surfaced by credential resolution.
///
/// Individual tier failures are recovered by falling through to the next
/// tier; only total exhaustion is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("No valid cookies found. Please refresh the page and try again.")]
    NoCredentialAvailable,
}
