//! Cookie jar port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::credential::CookiePair;

/// Port for querying the system cookie jar.
#[async_trait]
pub trait CookieJar: Send + Sync {
    /// Returns cookies whose domain is `domain` or one of its subdomains.
    ///
    /// A leading `.` on `domain` is ignored.
    async fn query_by_domain(&self, domain: &str) -> Result<Vec<CookiePair>, CookieJarError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieJarError {
    #[error("Cookie jar unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed cookie jar entry at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
