//! Ticket details endpoint configuration

use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ReqwestInvokerConfig;

/// Endpoint and header configuration for the ticket details call
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base endpoint; the ticket id is appended as the last path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Help-desk host whose pages carry tickets
    #[serde(default = "default_desk_host")]
    pub desk_host: String,

    /// Header carrying the session credential
    #[serde(default = "default_credential_header")]
    pub credential_header: String,

    /// Header marking extension-originated calls
    #[serde(default = "default_marker_header")]
    pub marker_header: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the invoker configuration
    pub fn invoker_config(&self) -> ReqwestInvokerConfig {
        ReqwestInvokerConfig::default()
            .with_credential_header(&self.credential_header)
            .with_marker_header(&self.marker_header)
            .with_timeout(self.timeout())
    }

    /// Validate endpoint configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ValidationError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.desk_host.trim().is_empty() {
            return Err(ValidationError::Missing("API__DESK_HOST"));
        }
        if self.credential_header.trim().is_empty() {
            return Err(ValidationError::Missing("API__CREDENTIAL_HEADER"));
        }
        if self.marker_header.trim().is_empty() {
            return Err(ValidationError::Missing("API__MARKER_HEADER"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::TimeoutOutOfRange);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            desk_host: default_desk_host(),
            credential_header: default_credential_header(),
            marker_header: default_marker_header(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://support.uat.karmayogibharat.net/zoho_plugin/ticket/details".to_string()
}

fn default_desk_host() -> String {
    "desk.zoho.in".to_string()
}

fn default_credential_header() -> String {
    "X-Zoho-Cookies".to_string()
}

fn default_marker_header() -> String {
    "X-Extension-Request".to_string()
}

fn default_timeout() -> u64 {
    30
}
