//! The session credential and the tier it was obtained from.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::thresholds::{CredentialStrength, CredentialThresholds};
use crate::domain::foundation::Timestamp;

/// Ordered source of credentials in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialTier {
    /// Captured from live traffic during this session.
    Memory,
    /// Persisted by a previous session.
    DurableStorage,
    /// Assembled from the cookie jar.
    CookieJar,
}

impl CredentialTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialTier::Memory => "memory",
            CredentialTier::DurableStorage => "durable_storage",
            CredentialTier::CookieJar => "cookie_jar",
        }
    }
}

impl fmt::Display for CredentialTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized session cookie string used to authenticate the ticket call.
///
/// The value is held as a [`Secret`] so that `Debug` output and logs only
/// ever show its length.
#[derive(Debug, Clone)]
pub struct Credential {
    value: Secret<String>,
    length: usize,
    captured_at: Timestamp,
    source: CredentialTier,
}

impl Credential {
    /// Creates a credential captured now.
    pub fn new(value: impl Into<String>, source: CredentialTier) -> Self {
        Self::captured_at(value, source, Timestamp::now())
    }

    /// Creates a credential with an explicit capture time.
    pub fn captured_at(value: impl Into<String>, source: CredentialTier, at: Timestamp) -> Self {
        let value = value.into();
        Self {
            length: value.len(),
            value: Secret::new(value),
            captured_at: at,
            source,
        }
    }

    /// Exposes the raw cookie string (for building the outbound request).
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn captured_at_time(&self) -> Timestamp {
        self.captured_at
    }

    /// Tier the credential was originally obtained from.
    pub fn source(&self) -> CredentialTier {
        self.source
    }

    pub fn strength(&self, thresholds: &CredentialThresholds) -> CredentialStrength {
        thresholds.classify(self.length)
    }
}

/// Picks the best candidate: the first strong one, else the first weak one.
///
/// Candidates are expected in tier priority order. Rejected candidates are
/// never returned.
pub fn select_best<I>(candidates: I, thresholds: &CredentialThresholds) -> Option<Credential>
where
    I: IntoIterator<Item = Credential>,
{
    let mut first_weak = None;
    for candidate in candidates {
        match candidate.strength(thresholds) {
            CredentialStrength::Strong => return Some(candidate),
            CredentialStrength::Weak if first_weak.is_none() => first_weak = Some(candidate),
            _ => {}
        }
    }
    first_weak
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn credential_of(len: usize, source: CredentialTier) -> Credential {
        Credential::new("x".repeat(len), source)
    }

    #[test]
    fn debug_output_does_not_leak_the_value() {
        let credential = Credential::new("session=super-secret-value", CredentialTier::Memory);
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn length_is_captured_at_construction() {
        let credential = credential_of(120, CredentialTier::CookieJar);
        assert_eq!(credential.len(), 120);
        assert_eq!(credential.expose().len(), 120);
        assert_eq!(credential.source(), CredentialTier::CookieJar);
    }

    #[test]
    fn select_best_prefers_strong_over_earlier_weak() {
        let thresholds = CredentialThresholds::default();
        let chosen = select_best(
            vec![
                credential_of(80, CredentialTier::Memory),
                credential_of(150, CredentialTier::CookieJar),
            ],
            &thresholds,
        )
        .unwrap();
        assert_eq!(chosen.source(), CredentialTier::CookieJar);
    }

    #[test]
    fn select_best_takes_first_weak_in_tier_order() {
        let thresholds = CredentialThresholds::default();
        let chosen = select_best(
            vec![
                credential_of(10, CredentialTier::Memory),
                credential_of(60, CredentialTier::DurableStorage),
                credential_of(90, CredentialTier::CookieJar),
            ],
            &thresholds,
        )
        .unwrap();
        assert_eq!(chosen.source(), CredentialTier::DurableStorage);
    }

    #[test]
    fn select_best_returns_none_when_all_rejected() {
        let thresholds = CredentialThresholds::default();
        let chosen = select_best(
            vec![
                credential_of(49, CredentialTier::Memory),
                credential_of(0, CredentialTier::CookieJar),
            ],
            &thresholds,
        );
        assert!(chosen.is_none());
    }

    proptest! {
        #[test]
        fn chosen_candidate_is_never_weaker_than_any_other(lengths in prop::collection::vec(0usize..300, 0..6)) {
            let thresholds = CredentialThresholds::default();
            let candidates: Vec<Credential> = lengths
                .iter()
                .map(|len| credential_of(*len, CredentialTier::Memory))
                .collect();
            let strongest = lengths.iter().map(|len| thresholds.classify(*len)).max();

            match select_best(candidates, &thresholds) {
                Some(chosen) => {
                    prop_assert!(chosen.len() >= thresholds.minimum_length);
                    prop_assert_eq!(Some(chosen.strength(&thresholds)), strongest);
                }
                None => {
                    prop_assert!(lengths.iter().all(|len| *len < thresholds.minimum_length));
                }
            }
        }
    }
}
