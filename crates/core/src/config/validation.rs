//! Configuration validation rules.
//!
//! Validation runs after loading, over values from environment, file, or
//! defaults alike.

use crate::config::ProxyConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl ProxyConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `version` is empty or contains whitespace
    /// - `origin` is not an absolute http(s) URL
    /// - `api_prefix`, `offline_path`, or any static prefix is not `/`-anchored
    /// - `timeout_ms` is below 100ms or above 5 minutes
    /// - `max_bytes` is 0 or exceeds 50MB
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() || self.version.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "version".into(),
                reason: "must be a non-empty tag without whitespace".into(),
            });
        }

        match url::Url::parse(&self.origin) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => {
                return Err(ConfigError::Invalid {
                    field: "origin".into(),
                    reason: format!("unsupported scheme: {}", parsed.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "origin".into(), reason: e.to_string() });
            }
        }

        if !self.api_prefix.starts_with('/') || !self.api_prefix.ends_with('/') {
            return Err(ConfigError::Invalid {
                field: "api_prefix".into(),
                reason: "must start and end with '/'".into(),
            });
        }

        if self.static_prefixes.is_empty() {
            return Err(ConfigError::Invalid {
                field: "static_prefixes".into(),
                reason: "must not be empty".into(),
            });
        }
        for prefix in &self.static_prefixes {
            if !prefix.starts_with('/') {
                return Err(ConfigError::Invalid {
                    field: "static_prefixes".into(),
                    reason: format!("prefix '{prefix}' must start with '/'"),
                });
            }
        }

        if !self.offline_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "offline_path".into(),
                reason: "must start with '/'".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        Ok(())
    }
}
