//! Proxy Configuration Settings
//!
//! Configuration types for the session proxy, loaded from environment
//! variables. Credentials are NOT configured here: they arrive with each
//! login request and are never held beyond that call.

use std::time::Duration;

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Port the public HTTP surface listens on.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 10_000 }
    }
}

/// Upstream provider settings.
#[derive(Debug, Clone)]
pub struct SmartApiSettings {
    /// Base URL of the SmartAPI REST endpoint.
    pub base_url: String,
    /// Bound on every upstream call.
    pub timeout: Duration,
}

impl Default for SmartApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://apiconnect.angelone.in".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Complete proxy configuration.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Upstream provider settings.
    pub smartapi: SmartApiSettings,
}

impl ProxyConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional: `PORT`, `SMARTAPI_BASE_URL`,
    /// `SMARTAPI_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but empty or unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_port = parse_env_u16("PORT", ServerSettings::default().http_port)?;

        let base_url = match std::env::var("SMARTAPI_BASE_URL") {
            Ok(value) if value.is_empty() => {
                return Err(ConfigError::EmptyValue("SMARTAPI_BASE_URL".to_string()));
            }
            Ok(value) => value.trim_end_matches('/').to_string(),
            Err(_) => SmartApiSettings::default().base_url,
        };

        let timeout_secs = parse_env_u64(
            "SMARTAPI_TIMEOUT_SECS",
            SmartApiSettings::default().timeout.as_secs(),
        )?;

        Ok(Self {
            server: ServerSettings { http_port },
            smartapi: SmartApiSettings {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    std::env::var(name).map_or(Ok(default), |value| parse_value(name, &value))
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |value| parse_value(name, &value))
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string(), value.to_string()))
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but empty.
    #[error("environment variable {0} is set but empty")]
    EmptyValue(String),

    /// An environment variable holds an unparsable value.
    #[error("environment variable {0} holds invalid value {1:?}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_conventions() {
        let config = ProxyConfig::default();
        assert_eq!(config.server.http_port, 10_000);
        assert_eq!(config.smartapi.base_url, "https://apiconnect.angelone.in");
        assert_eq!(config.smartapi.timeout, Duration::from_secs(10));
    }

    #[test]
    fn parse_value_rejects_garbage() {
        let result: Result<u16, _> = parse_value("PORT", "not-a-port");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_, _))));
    }

    #[test]
    fn parse_value_accepts_valid_ports() {
        let port: u16 = parse_value("PORT", "10000").unwrap();
        assert_eq!(port, 10_000);
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        assert_eq!(parse_env_u16("SMARTAPI_UNSET_VAR", 42).unwrap(), 42);
    }
}
