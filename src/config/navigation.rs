//! Navigation settle delays

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How long to let the host page settle before triggering
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// Delay after the initial page load, in milliseconds
    #[serde(default = "default_initial_settle")]
    pub initial_settle_ms: u64,

    /// Delay after an in-page address change, in milliseconds
    #[serde(default = "default_navigation_settle")]
    pub navigation_settle_ms: u64,
}

impl NavigationConfig {
    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }

    pub fn navigation_settle(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.initial_settle_ms == 0 || self.navigation_settle_ms == 0 {
            return Err(ValidationError::InvalidSettleDelay);
        }
        if self.navigation_settle_ms <= self.initial_settle_ms {
            return Err(ValidationError::NavigationSettleTooShort);
        }
        Ok(())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            initial_settle_ms: default_initial_settle(),
            navigation_settle_ms: default_navigation_settle(),
        }
    }
}

fn default_initial_settle() -> u64 {
    1500
}

fn default_navigation_settle() -> u64 {
    2000
}
