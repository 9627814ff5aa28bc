//! Process configuration from environment variables.
//!
//! Read once at startup and shared read-only afterwards.

use std::time::Duration;

use crate::providers::{irail, opendata, transportapi};

/// Default per-request upstream timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Default per-provider deadline inside one dispatch, in seconds.
pub const DEFAULT_DISPATCH_DEADLINE_SECS: u64 = 15;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but not a positive whole number.
    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },
}

/// TransportAPI credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct UkCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl std::fmt::Debug for UkCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UkCredentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .finish()
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// transport.opendata.ch base URL
    pub ch_base_url: String,
    /// api.irail.be base URL
    pub be_base_url: String,
    /// transportapi.com base URL
    pub uk_base_url: String,
    /// UK credentials; `None` disables the UK provider
    pub uk_credentials: Option<UkCredentials>,
    /// Timeout for each outbound request
    pub upstream_timeout_secs: u64,
    /// Deadline for each provider's part of a dispatch
    pub dispatch_deadline_secs: u64,
    /// Log level used when no CLI flag is given
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ch_base_url: opendata::DEFAULT_BASE_URL.to_string(),
            be_base_url: irail::DEFAULT_BASE_URL.to_string(),
            uk_base_url: transportapi::DEFAULT_BASE_URL.to_string(),
            uk_credentials: None,
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            dispatch_deadline_secs: DEFAULT_DISPATCH_DEADLINE_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if it is set. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let uk_credentials = match (get("UK_TRANSPORT_APP_ID"), get("UK_TRANSPORT_API_KEY")) {
            (Some(app_id), Some(app_key)) => Some(UkCredentials { app_id, app_key }),
            _ => None,
        };

        Ok(Self {
            ch_base_url: get("CH_BASE_URL").unwrap_or(defaults.ch_base_url),
            be_base_url: get("BE_BASE_URL").unwrap_or(defaults.be_base_url),
            uk_base_url: get("UK_BASE_URL").unwrap_or(defaults.uk_base_url),
            uk_credentials,
            upstream_timeout_secs: seconds("UPSTREAM_TIMEOUT_SECS", get("UPSTREAM_TIMEOUT_SECS"))?
                .unwrap_or(defaults.upstream_timeout_secs),
            dispatch_deadline_secs: seconds(
                "DISPATCH_DEADLINE_SECS",
                get("DISPATCH_DEADLINE_SECS"),
            )?
            .unwrap_or(defaults.dispatch_deadline_secs),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// The per-provider dispatch deadline.
    pub fn dispatch_deadline(&self) -> Duration {
        Duration::from_secs(self.dispatch_deadline_secs)
    }

    /// Why the UK provider is off, if it is.
    pub fn uk_disabled_reason(&self) -> Option<&'static str> {
        self.uk_credentials
            .is_none()
            .then_some("UK_TRANSPORT_APP_ID and UK_TRANSPORT_API_KEY must both be set")
    }
}

fn seconds(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(secs)),
        _ => Err(ConfigError::InvalidSeconds { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ch_base_url, "https://transport.opendata.ch/v1");
        assert_eq!(config.upstream_timeout_secs, 10);
        assert_eq!(config.dispatch_deadline(), Duration::from_secs(15));
        assert!(config.uk_disabled_reason().is_some());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("CH_BASE_URL", "http://localhost:1"),
            ("BE_BASE_URL", " http://localhost:2 "),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("DISPATCH_DEADLINE_SECS", "5"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(config.ch_base_url, "http://localhost:1");
        assert_eq!(config.be_base_url, "http://localhost:2");
        assert_eq!(config.upstream_timeout_secs, 3);
        assert_eq!(config.dispatch_deadline_secs, 5);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn uk_needs_both_credentials() {
        let only_id = config_from(&[("UK_TRANSPORT_APP_ID", "abc")]).unwrap();
        assert!(only_id.uk_credentials.is_none());

        let blank_key =
            config_from(&[("UK_TRANSPORT_APP_ID", "abc"), ("UK_TRANSPORT_API_KEY", "  ")]).unwrap();
        assert!(blank_key.uk_credentials.is_none());

        let both =
            config_from(&[("UK_TRANSPORT_APP_ID", "abc"), ("UK_TRANSPORT_API_KEY", "xyz")]).unwrap();
        assert!(both.uk_disabled_reason().is_none());
        assert_eq!(both.uk_credentials.unwrap().app_key, "xyz");
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert_eq!(
            config_from(&[("UPSTREAM_TIMEOUT_SECS", "ten")]),
            Err(ConfigError::InvalidSeconds {
                var: "UPSTREAM_TIMEOUT_SECS",
                value: "ten".to_string()
            })
        );
        assert!(config_from(&[("DISPATCH_DEADLINE_SECS", "0")]).is_err());
        assert!(config_from(&[("DISPATCH_DEADLINE_SECS", "-1")]).is_err());
    }

    #[test]
    fn debug_redacts_uk_key() {
        let config =
            config_from(&[("UK_TRANSPORT_APP_ID", "abc"), ("UK_TRANSPORT_API_KEY", "hunter2")])
                .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
