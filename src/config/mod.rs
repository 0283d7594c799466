//! Typed settings for the bridge, read from `TICKET_BRIDGE__*` variables.
//!
//! A `.env` file is honoured during development. Every field has a default,
//! so the binary runs against the production endpoint with no setup.
//!
//! ```no_run
//! use ticket_bridge::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("Calling {}", config.api.base_url);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod api;
mod credentials;
mod error;
mod logging;
mod navigation;
mod storage;

pub use api::ApiConfig;
pub use credentials::CredentialConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use navigation::NavigationConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ticket details endpoint and request headers
    #[serde(default)]
    pub api: ApiConfig,

    /// Credential thresholds, observed origins and cookie domains
    #[serde(default)]
    pub credentials: CredentialConfig,

    /// Settle delays for the page agent
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Durable storage and cookie jar locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads `TICKET_BRIDGE__<SECTION>__<FIELD>` variables, for example
    /// `TICKET_BRIDGE__API__BASE_URL` or
    /// `TICKET_BRIDGE__CREDENTIALS__COOKIE_DOMAINS=a.com,.a.com`.
    ///
    /// Fails when a present value cannot be parsed or the result does not
    /// pass [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TICKET_BRIDGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<AppConfig>()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field rules the types cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.credentials.validate()?;
        self.navigation.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-wide.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("TICKET_BRIDGE__API__BASE_URL");
        env::remove_var("TICKET_BRIDGE__API__TIMEOUT_SECS");
        env::remove_var("TICKET_BRIDGE__CREDENTIALS__COOKIE_DOMAINS");
        env::remove_var("TICKET_BRIDGE__NAVIGATION__INITIAL_SETTLE_MS");
        env::remove_var("TICKET_BRIDGE__LOGGING__JSON");
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.expect("empty environment loads");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.credentials.minimum_length, 50);
        assert_eq!(config.navigation.initial_settle_ms, 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_read_from_prefixed_variables() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("TICKET_BRIDGE__API__BASE_URL", "http://localhost:9000/ticket/details");
        env::set_var("TICKET_BRIDGE__API__TIMEOUT_SECS", "5");
        env::set_var("TICKET_BRIDGE__CREDENTIALS__COOKIE_DOMAINS", "a.example,.a.example");
        env::set_var("TICKET_BRIDGE__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000/ticket/details");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(
            config.credentials.cookie_domain_list(),
            vec!["a.example", ".a.example"]
        );
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_rejects_zero_settle_delay() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("TICKET_BRIDGE__NAVIGATION__INITIAL_SETTLE_MS", "0");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::Invalid(ValidationError::InvalidSettleDelay))
        ));
    }

    #[test]
    fn test_load_rejects_navigation_delay_not_above_initial() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("TICKET_BRIDGE__NAVIGATION__INITIAL_SETTLE_MS", "2500");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::Invalid(ValidationError::NavigationSettleTooShort))
        ));
    }
}
