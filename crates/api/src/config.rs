//! Layered service configuration
//!
//! Defaults, then an optional config file, then `ALERTD__`-prefixed
//! environment variables (`ALERTD__SERVER__BIND_ADDR=127.0.0.1:9000`).

use crate::rate_limit::RateLimitConfig;
use ::config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Config file looked up when `ALERTD_CONFIG` is unset (any supported extension)
pub const DEFAULT_CONFIG_PATH: &str = "config/alertd";

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment: development, staging or production
    pub environment: String,
    /// Echo internal error detail to API callers (development only)
    pub show_detailed_errors: bool,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub metrics: MetricsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            show_detailed_errors: false,
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            rate_limit: RateLimitConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `/metrics`
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// Load from `ALERTD_CONFIG` (or [`DEFAULT_CONFIG_PATH`]) plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("ALERTD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from the given file (optional) plus the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("ALERTD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(!config.show_detailed_errors);
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert!(config.rate_limit.enabled);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from("/nonexistent/alertd-config").unwrap();
        assert_eq!(config.server.bind_addr, AppConfig::default().server.bind_addr);
    }

    #[test]
    fn test_file_overrides() {
        let path = std::env::temp_dir().join(format!("alertd-test-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "environment = \"Production\"\nshow_detailed_errors = true\n\n[server]\nbind_addr = \"127.0.0.1:9000\"\n\n[rate_limit]\nburst_size = 20"
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(config.is_production());
        assert!(config.show_detailed_errors);
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.rate_limit.burst_size, 20);
        // Untouched fields keep their defaults
        assert_eq!(config.rate_limit.per_second, 2);
        assert_eq!(config.logging.level, "info");
    }
}
