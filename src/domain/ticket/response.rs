//! Normalized outcome of a ticket details call.
//!
//! Responses cross context boundaries as plain data, so failures are values
//! here rather than error types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hint shown with every failure.
pub const TROUBLESHOOTING_HINT: &str =
    "Try refreshing the page and ensure you are logged into the help desk";

/// Classification of a failed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Every credential tier was below the minimum length.
    NoCredentialAvailable,
    /// Transport-level failure.
    Network,
    /// Non-2xx HTTP status.
    Http,
    /// Body was not valid JSON.
    Decode,
    /// The receiving context went away before replying.
    ChannelClosed,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NoCredentialAvailable => "no_credential_available",
            FailureKind::Network => "network",
            FailureKind::Http => "http",
            FailureKind::Decode => "decode",
            FailureKind::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one pipeline run, consumed exactly once by the requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireResponse", try_from = "WireResponse")]
pub enum ApiResponse {
    Success {
        data: serde_json::Value,
    },
    Failure {
        error_kind: FailureKind,
        message: String,
    },
}

impl ApiResponse {
    pub fn success(data: serde_json::Value) -> Self {
        ApiResponse::Success { data }
    }

    pub fn failure(error_kind: FailureKind, message: impl Into<String>) -> Self {
        ApiResponse::Failure {
            error_kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    /// Returns the failure kind, if this is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Failure { error_kind, .. } => Some(*error_kind),
        }
    }
}

/// `{"success": true, "data": ...}` / `{"success": false, "errorKind": ..., "error": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<ApiResponse> for WireResponse {
    fn from(response: ApiResponse) -> Self {
        match response {
            ApiResponse::Success { data } => WireResponse {
                success: true,
                data: Some(data),
                error_kind: None,
                error: None,
            },
            ApiResponse::Failure {
                error_kind,
                message,
            } => WireResponse {
                success: false,
                data: None,
                error_kind: Some(error_kind),
                error: Some(message),
            },
        }
    }
}

impl TryFrom<WireResponse> for ApiResponse {
    type Error = String;

    fn try_from(wire: WireResponse) -> Result<Self, Self::Error> {
        if wire.success {
            Ok(ApiResponse::Success {
                data: wire.data.unwrap_or(serde_json::Value::Null),
            })
        } else {
            let error_kind = wire
                .error_kind
                .ok_or_else(|| "failure response is missing errorKind".to_string())?;
            Ok(ApiResponse::Failure {
                error_kind,
                message: wire.error.unwrap_or_default(),
            })
        }
    }
}
