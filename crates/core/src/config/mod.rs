//! Proxy configuration with layered loading.
//!
//! Configuration is assembled with figment from three sources:
//!
//! 1. Environment variables (OMBRA_*)
//! 2. TOML config file (if OMBRA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Request cache proxy configuration.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (OMBRA_*)
/// 2. TOML config file (if OMBRA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Deployment generation tag. Bumping it on redeploy is the sole cache
    /// invalidation trigger: activation purges every partition whose name
    /// carries a different tag.
    #[serde(default = "default_version")]
    pub version: String,

    /// Origin of the host application, used for same-origin classification
    /// and to resolve root-relative manifest paths.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to the SQLite store backing the cache partitions.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path prefix identifying backend data endpoints (network-first, `api`
    /// partition).
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Path prefixes served cache-first (images, uploads, generic files).
    #[serde(default = "default_static_prefixes")]
    pub static_prefixes: Vec<String>,

    /// Path of the offline fallback document, served when a navigation fails
    /// with no cached copy of the requested page.
    #[serde(default = "default_offline_path")]
    pub offline_path: String,

    /// User-Agent string for outgoing requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Network request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes accepted per response body.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_version() -> String {
    "v1".into()
}

fn default_origin() -> String {
    "http://localhost:5000".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./ombra-cache.sqlite")
}

fn default_api_prefix() -> String {
    "/api/".into()
}

fn default_static_prefixes() -> Vec<String> {
    vec!["/images/".into(), "/uploads/".into(), "/files/".into()]
}

fn default_offline_path() -> String {
    "/offline.html".into()
}

fn default_user_agent() -> String {
    "ombra/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            origin: default_origin(),
            db_path: default_db_path(),
            api_prefix: default_api_prefix(),
            static_prefixes: default_static_prefixes(),
            offline_path: default_offline_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl ProxyConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Name of the core partition for the current version.
    pub fn core_partition(&self) -> String {
        format!("core-{}", self.version)
    }

    /// Name of the runtime partition for the current version.
    pub fn runtime_partition(&self) -> String {
        format!("runtime-{}", self.version)
    }

    /// Name of the api partition for the current version.
    pub fn api_partition(&self) -> String {
        format!("api-{}", self.version)
    }

    /// The three partition names belonging to the current version, in the
    /// order they are created. Everything else is evicted on activation.
    pub fn current_partitions(&self) -> Vec<String> {
        vec![self.core_partition(), self.runtime_partition(), self.api_partition()]
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("OMBRA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("OMBRA_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProxyConfig::default();
        assert_eq!(config.version, "v1");
        assert_eq!(config.origin, "http://localhost:5000");
        assert_eq!(config.api_prefix, "/api/");
        assert_eq!(config.static_prefixes, vec!["/images/", "/uploads/", "/files/"]);
        assert_eq!(config.offline_path, "/offline.html");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_bytes, 5_242_880);
    }

    #[test]
    fn test_partition_names_carry_version() {
        let config = ProxyConfig { version: "v3".into(), ..Default::default() };
        assert_eq!(config.core_partition(), "core-v3");
        assert_eq!(config.runtime_partition(), "runtime-v3");
        assert_eq!(config.api_partition(), "api-v3");
        assert_eq!(config.current_partitions().len(), 3);
    }

    #[test]
    fn test_timeout_duration() {
        let config = ProxyConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }
}
