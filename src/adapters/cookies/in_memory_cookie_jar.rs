//! In-memory cookie jar for tests and development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::domain_matches;
use crate::domain::credential::CookiePair;
use crate::ports::{CookieJar, CookieJarError};

/// Cookie jar holding `(domain, cookie)` entries in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCookieJar {
    cookies: RwLock<Vec<(String, CookiePair)>>,
    queries: AtomicUsize,
}

impl InMemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cookie for a domain.
    pub async fn insert(&self, domain: impl Into<String>, cookie: CookiePair) {
        self.cookies.write().await.push((domain.into(), cookie));
    }

    /// Builder-style variant of [`insert`](Self::insert) for test setup.
    pub fn with_cookie(mut self, domain: impl Into<String>, name: &str, value: &str) -> Self {
        self.cookies
            .get_mut()
            .push((domain.into(), CookiePair::new(name, value)));
        self
    }

    /// Number of domain queries served (for test assertions).
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CookieJar for InMemoryCookieJar {
    async fn query_by_domain(&self, domain: &str) -> Result<Vec<CookiePair>, CookieJarError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .cookies
            .read()
            .await
            .iter()
            .filter(|(cookie_domain, _)| domain_matches(cookie_domain, domain))
            .map(|(_, cookie)| cookie.clone())
            .collect())
    }
}
