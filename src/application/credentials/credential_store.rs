//! CredentialStore - resolves the best available session credential.
//!
//! Tiers are consulted in order: the in-memory capture, durable storage, then
//! the cookie jar. A strong credential from any tier wins immediately; if none
//! is strong, the first weak credential in tier order is used.

use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::credential::{
    join_cookie_header, merge_cookies, select_best, Credential, CredentialError,
    CredentialObservation, CredentialStrength, CredentialThresholds, CredentialTier,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{CookieJar, KeyValueStore, StorageRecord};

/// Storage key holding the captured cookie string.
pub const CREDENTIAL_KEY: &str = "capturedCredential";

/// Storage key holding the capture time in unix milliseconds.
pub const CAPTURED_AT_KEY: &str = "capturedAt";

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub credential: Credential,
    pub strength: CredentialStrength,
}

impl ResolvedCredential {
    /// Tier the credential originally came from.
    pub fn tier(&self) -> CredentialTier {
        self.credential.source()
    }
}

/// Tiered credential store shared by the observer feed and the coordinator.
pub struct CredentialStore {
    memory: RwLock<Option<Credential>>,
    storage: Arc<dyn KeyValueStore>,
    cookie_jar: Arc<dyn CookieJar>,
    cookie_domains: Vec<String>,
    thresholds: CredentialThresholds,
}

impl CredentialStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        cookie_jar: Arc<dyn CookieJar>,
        cookie_domains: Vec<String>,
        thresholds: CredentialThresholds,
    ) -> Self {
        Self {
            memory: RwLock::new(None),
            storage,
            cookie_jar,
            cookie_domains,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &CredentialThresholds {
        &self.thresholds
    }

    /// Returns the in-memory credential, if one has been captured or promoted.
    pub async fn current(&self) -> Option<Credential> {
        self.memory.read().await.clone()
    }

    /// Resolves the best credential across all tiers.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NoCredentialAvailable`] when every tier is
    /// empty or below the minimum length.
    pub async fn resolve(&self) -> Result<ResolvedCredential, CredentialError> {
        let mut candidates = Vec::with_capacity(3);

        if let Some(credential) = self.current().await {
            if let Some(resolved) = self.accept_if_strong(&credential) {
                return Ok(resolved);
            }
            candidates.push(credential);
        }

        if let Some(credential) = self.read_storage().await {
            if let Some(resolved) = self.accept_if_strong(&credential) {
                *self.memory.write().await = Some(credential);
                return Ok(resolved);
            }
            candidates.push(credential);
        }

        if let Some(credential) = self.read_cookie_jar().await {
            if let Some(resolved) = self.accept_if_strong(&credential) {
                return Ok(resolved);
            }
            candidates.push(credential);
        }

        match select_best(candidates, &self.thresholds) {
            Some(credential) => {
                debug!(
                    tier = %credential.source(),
                    length = credential.len(),
                    "Falling back to weak credential"
                );
                if credential.source() == CredentialTier::DurableStorage {
                    *self.memory.write().await = Some(credential.clone());
                }
                Ok(ResolvedCredential {
                    strength: credential.strength(&self.thresholds),
                    credential,
                })
            }
            None => {
                warn!("No credential tier produced an acceptable value");
                Err(CredentialError::NoCredentialAvailable)
            }
        }
    }

    /// Replaces the in-memory credential and persists it.
    ///
    /// Values below the minimum length are ignored so they never replace a
    /// usable stored credential. Persist failures are logged; the in-memory
    /// tier is updated regardless.
    pub async fn record_observation(&self, credential: Credential) {
        if credential.strength(&self.thresholds) == CredentialStrength::Rejected {
            debug!(length = credential.len(), "Ignoring observation below minimum length");
            return;
        }

        let mut record = StorageRecord::new();
        record.insert(
            CREDENTIAL_KEY.to_string(),
            Value::String(credential.expose().to_string()),
        );
        record.insert(
            CAPTURED_AT_KEY.to_string(),
            Value::from(credential.captured_at_time().as_unix_millis()),
        );
        let length = credential.len();

        *self.memory.write().await = Some(credential);

        match self.storage.set(record).await {
            Ok(()) => debug!(length, "Persisted captured credential"),
            Err(e) => warn!(error = %e, length, "Failed to persist captured credential"),
        }
    }

    /// Consumes observation events until the sending side is dropped.
    pub fn spawn_observation_feed(
        self: &Arc<Self>,
        mut observations: UnboundedReceiver<CredentialObservation>,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(observation) = observations.recv().await {
                info!(
                    url = %observation.request_url,
                    length = observation.credential.len(),
                    "Captured credential from live traffic"
                );
                store.record_observation(observation.credential).await;
            }
            debug!("Credential observation feed closed");
        })
    }

    fn accept_if_strong(&self, credential: &Credential) -> Option<ResolvedCredential> {
        let strength = credential.strength(&self.thresholds);
        debug!(
            tier = %credential.source(),
            length = credential.len(),
            ?strength,
            "Considered credential tier"
        );
        (strength == CredentialStrength::Strong).then(|| ResolvedCredential {
            credential: credential.clone(),
            strength,
        })
    }

    async fn read_storage(&self) -> Option<Credential> {
        let record = match self.storage.get(&[CREDENTIAL_KEY, CAPTURED_AT_KEY]).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Durable credential storage unreadable, skipping tier");
                return None;
            }
        };

        let value = record.get(CREDENTIAL_KEY)?.as_str()?.to_string();
        let captured_at = record
            .get(CAPTURED_AT_KEY)
            .and_then(Value::as_i64)
            .and_then(Timestamp::from_unix_millis)
            .unwrap_or_else(Timestamp::now);
        Some(Credential::captured_at(
            value,
            CredentialTier::DurableStorage,
            captured_at,
        ))
    }

    async fn read_cookie_jar(&self) -> Option<Credential> {
        let queries = self
            .cookie_domains
            .iter()
            .map(|domain| self.cookie_jar.query_by_domain(domain));
        let results = join_all(queries).await;

        let batches = results
            .into_iter()
            .zip(&self.cookie_domains)
            .map(|(result, domain)| {
                result.unwrap_or_else(|e| {
                    warn!(domain = %domain, error = %e, "Cookie jar query failed");
                    Vec::new()
                })
            });
        let merged = merge_cookies(batches);
        if merged.is_empty() {
            return None;
        }
        Some(Credential::new(
            join_cookie_header(&merged),
            CredentialTier::CookieJar,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCookieJar, InMemoryKeyValueStore};
    use crate::domain::credential::CookiePair;
    use crate::ports::{CookieJarError, StorageError};
    use async_trait::async_trait;

    const DOMAINS: [&str; 3] = ["desk.zoho.in", ".zoho.in", "zoho.in"];

    fn domains() -> Vec<String> {
        DOMAINS.iter().map(|d| d.to_string()).collect()
    }

    fn value_of(len: usize) -> String {
        "k".repeat(len)
    }

    fn stored(value: &str) -> StorageRecord {
        let mut record = StorageRecord::new();
        record.insert(CREDENTIAL_KEY.to_string(), Value::String(value.to_string()));
        record.insert(CAPTURED_AT_KEY.to_string(), Value::from(1_700_000_000_000i64));
        record
    }

    fn store_with(storage: InMemoryKeyValueStore, jar: InMemoryCookieJar) -> CredentialStore {
        CredentialStore::new(
            Arc::new(storage),
            Arc::new(jar),
            domains(),
            CredentialThresholds::default(),
        )
    }

    struct FailingStorage;

    #[async_trait]
    impl KeyValueStore for FailingStorage {
        async fn get(&self, _keys: &[&str]) -> Result<StorageRecord, StorageError> {
            Err(StorageError::Io("disk gone".to_string()))
        }

        async fn set(&self, _record: StorageRecord) -> Result<(), StorageError> {
            Err(StorageError::Io("disk gone".to_string()))
        }
    }

    struct FailingJar;

    #[async_trait]
    impl CookieJar for FailingJar {
        async fn query_by_domain(&self, _domain: &str) -> Result<Vec<CookiePair>, CookieJarError> {
            Err(CookieJarError::Unavailable("no jar".to_string()))
        }
    }

    #[tokio::test]
    async fn strong_memory_credential_wins_without_touching_cookie_jar() {
        let jar = Arc::new(InMemoryCookieJar::new().with_cookie("desk.zoho.in", "a", "1"));
        let store = CredentialStore::new(
            Arc::new(InMemoryKeyValueStore::new()),
            jar.clone(),
            domains(),
            CredentialThresholds::default(),
        );
        store
            .record_observation(Credential::new(value_of(150), CredentialTier::Memory))
            .await;

        let resolved = store.resolve().await.unwrap();
        assert_eq!(resolved.tier(), CredentialTier::Memory);
        assert_eq!(resolved.strength, CredentialStrength::Strong);
        assert_eq!(jar.query_count(), 0);
    }

    #[tokio::test]
    async fn strong_storage_credential_is_promoted_and_reported_as_storage() {
        let store = store_with(
            InMemoryKeyValueStore::with_record(stored(&value_of(120))),
            InMemoryCookieJar::new(),
        );

        let first = store.resolve().await.unwrap();
        assert_eq!(first.tier(), CredentialTier::DurableStorage);
        assert_eq!(store.current().await.unwrap().len(), 120);

        let second = store.resolve().await.unwrap();
        assert_eq!(second.tier(), CredentialTier::DurableStorage);
        assert_eq!(second.credential.expose(), first.credential.expose());
    }

    #[tokio::test]
    async fn cookie_jar_merge_prefers_first_domain() {
        let long = value_of(110);
        let jar = InMemoryCookieJar::new()
            .with_cookie("desk.zoho.in", "session", &long)
            .with_cookie("accounts.zoho.in", "session", "other")
            .with_cookie("accounts.zoho.in", "lang", "en");
        let store = store_with(InMemoryKeyValueStore::new(), jar);

        let resolved = store.resolve().await.unwrap();
        assert_eq!(resolved.tier(), CredentialTier::CookieJar);
        assert_eq!(
            resolved.credential.expose(),
            format!("session={}; lang=en", long)
        );
    }

    #[tokio::test]
    async fn weak_credential_is_used_when_nothing_is_strong() {
        let store = store_with(
            InMemoryKeyValueStore::with_record(stored(&value_of(70))),
            InMemoryCookieJar::new().with_cookie("desk.zoho.in", "a", &value_of(80)),
        );
        store
            .record_observation(Credential::new(value_of(20), CredentialTier::Memory))
            .await;

        let resolved = store.resolve().await.unwrap();
        assert_eq!(resolved.strength, CredentialStrength::Weak);
        // the 20 char observation never reached memory or storage
        assert_eq!(resolved.tier(), CredentialTier::DurableStorage);
        assert_eq!(resolved.credential.len(), 70);
        // weak stored winner is promoted for the next resolution
        assert_eq!(store.current().await.unwrap().len(), 70);
    }

    #[tokio::test]
    async fn short_observation_does_not_overwrite_stored_credential() {
        let storage = Arc::new(InMemoryKeyValueStore::with_record(stored(&value_of(70))));
        let store = CredentialStore::new(
            storage.clone(),
            Arc::new(InMemoryCookieJar::new()),
            domains(),
            CredentialThresholds::default(),
        );

        store
            .record_observation(Credential::new(value_of(20), CredentialTier::Memory))
            .await;

        assert!(store.current().await.is_none());
        let snapshot = storage.snapshot().await;
        assert_eq!(snapshot[CREDENTIAL_KEY], Value::String(value_of(70)));
    }

    #[tokio::test]
    async fn strong_cookie_jar_beats_weak_memory() {
        let store = store_with(
            InMemoryKeyValueStore::new(),
            InMemoryCookieJar::new().with_cookie("desk.zoho.in", "s", &value_of(200)),
        );
        store
            .record_observation(Credential::new(value_of(60), CredentialTier::Memory))
            .await;

        let resolved = store.resolve().await.unwrap();
        assert_eq!(resolved.tier(), CredentialTier::CookieJar);
        assert_eq!(resolved.strength, CredentialStrength::Strong);
    }

    #[tokio::test]
    async fn nothing_acceptable_yields_no_credential_error() {
        let store = store_with(
            InMemoryKeyValueStore::with_record(stored("short")),
            InMemoryCookieJar::new().with_cookie("zoho.in", "a", "1"),
        );

        let result = store.resolve().await;
        assert_eq!(result.unwrap_err(), CredentialError::NoCredentialAvailable);
    }

    #[tokio::test]
    async fn failing_tiers_fall_through() {
        let store = CredentialStore::new(
            Arc::new(FailingStorage),
            Arc::new(FailingJar),
            domains(),
            CredentialThresholds::default(),
        );
        assert!(store.resolve().await.is_err());

        store
            .record_observation(Credential::new(value_of(101), CredentialTier::Memory))
            .await;
        let resolved = store.resolve().await.unwrap();
        assert_eq!(resolved.tier(), CredentialTier::Memory);
    }

    #[tokio::test]
    async fn record_observation_persists_value_and_timestamp() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let store = CredentialStore::new(
            storage.clone(),
            Arc::new(InMemoryCookieJar::new()),
            domains(),
            CredentialThresholds::default(),
        );
        let credential = Credential::new(value_of(64), CredentialTier::Memory);
        let captured_at = credential.captured_at_time().as_unix_millis();

        store.record_observation(credential).await;

        let snapshot = storage.snapshot().await;
        assert_eq!(snapshot[CREDENTIAL_KEY], Value::String(value_of(64)));
        assert_eq!(snapshot[CAPTURED_AT_KEY], Value::from(captured_at));
    }

    #[tokio::test]
    async fn observation_feed_updates_memory() {
        let store = Arc::new(store_with(
            InMemoryKeyValueStore::new(),
            InMemoryCookieJar::new(),
        ));
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let feed = store.spawn_observation_feed(rx);

        tx.send(CredentialObservation::new(
            "https://desk.zoho.in/api/v1/tickets",
            value_of(130),
        ))
        .unwrap();
        drop(tx);
        feed.await.unwrap();

        assert_eq!(store.current().await.unwrap().len(), 130);
    }
}
