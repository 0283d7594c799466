//! Length thresholds that decide whether a credential is usable.

use serde::{Deserialize, Serialize};

/// How usable a credential of a given length is.
///
/// Variants are ordered weakest first so candidates can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStrength {
    /// Shorter than the minimum viable length; never accepted.
    Rejected,
    /// At least the minimum length but not above the strong threshold.
    Weak,
    /// Longer than the strong threshold; wins immediately.
    Strong,
}

impl CredentialStrength {
    /// Returns true if a credential of this strength may be used at all.
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, CredentialStrength::Rejected)
    }
}

/// Minimum and strong acceptance lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialThresholds {
    /// Credentials shorter than this are rejected.
    pub minimum_length: usize,
    /// Credentials longer than this are strong.
    pub strong_length: usize,
}

impl CredentialThresholds {
    pub fn new(minimum_length: usize, strong_length: usize) -> Self {
        Self {
            minimum_length,
            strong_length,
        }
    }

    /// Classifies a credential length.
    pub fn classify(&self, length: usize) -> CredentialStrength {
        if length > self.strong_length {
            CredentialStrength::Strong
        } else if length >= self.minimum_length {
            CredentialStrength::Weak
        } else {
            CredentialStrength::Rejected
        }
    }
}

impl Default for CredentialThresholds {
    fn default() -> Self {
        Self::new(50, 100)
    }
}
