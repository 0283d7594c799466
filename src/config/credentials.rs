//! Credential acquisition configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::credential::{CredentialThresholds, OriginPattern};

/// Thresholds, observed origins and cookie-jar domains
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    /// Credentials shorter than this are never accepted
    #[serde(default = "default_minimum_length")]
    pub minimum_length: usize,

    /// Credentials longer than this win immediately
    #[serde(default = "default_strong_length")]
    pub strong_length: usize,

    /// Origins whose requests are inspected (comma-separated match patterns)
    #[serde(default = "default_target_origins")]
    pub target_origins: String,

    /// Cookie-jar domain variants, in priority order (comma-separated)
    #[serde(default = "default_cookie_domains")]
    pub cookie_domains: String,
}

impl CredentialConfig {
    pub fn thresholds(&self) -> CredentialThresholds {
        CredentialThresholds::new(self.minimum_length, self.strong_length)
    }

    /// Parses the observed origin allow-list
    pub fn origin_patterns(&self) -> Result<Vec<OriginPattern>, ValidationError> {
        split_list(&self.target_origins)
            .into_iter()
            .map(|raw| {
                raw.parse::<OriginPattern>()
                    .map_err(|e| ValidationError::InvalidOriginPattern(e.to_string()))
            })
            .collect()
    }

    /// Get cookie domains as a vector
    pub fn cookie_domain_list(&self) -> Vec<String> {
        split_list(&self.cookie_domains)
    }

    /// Validate credential configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.minimum_length == 0 || self.minimum_length >= self.strong_length {
            return Err(ValidationError::InvalidThresholds);
        }
        if self.origin_patterns()?.is_empty() {
            return Err(ValidationError::Missing("CREDENTIALS__TARGET_ORIGINS"));
        }
        if self.cookie_domain_list().is_empty() {
            return Err(ValidationError::Missing("CREDENTIALS__COOKIE_DOMAINS"));
        }
        Ok(())
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            minimum_length: default_minimum_length(),
            strong_length: default_strong_length(),
            target_origins: default_target_origins(),
            cookie_domains: default_cookie_domains(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_minimum_length() -> usize {
    50
}

fn default_strong_length() -> usize {
    100
}

fn default_target_origins() -> String {
    "https://desk.zoho.in/*,https://*.zoho.in/*,https://zoho.in/*".to_string()
}

fn default_cookie_domains() -> String {
    "desk.zoho.in,.zoho.in,zoho.in".to_string()
}
