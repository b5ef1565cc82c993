//! Application configuration loaded from TOML
//!
//! Every field has a default, so a partial file (or none at all) is valid.
//!
//! ```toml
//! [server]
//! api_port = 8080
//!
//! [database]
//! url = "sqlite:///var/lib/freight-billing/billing.db?mode=rwc"
//!
//! [billing]
//! default_due_days = 45
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::database::DatabaseConfig;
use crate::shared::retry::RetryConfig;

/// Env var that overrides the config file location
pub const CONFIG_ENV: &str = "BILLING_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `freight_billing=debug,info`
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub default_due_days: i64,
    pub currency: String,
    pub max_retry_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_due_days: 30,
            currency: "DZD".to_string(),
            max_retry_attempts: 3,
            retry_initial_delay_ms: 50,
            retry_max_delay_ms: 1000,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let cfg: AppConfig = toml::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.billing.default_due_days < 0 {
            return Err(ConfigError::Invalid(
                "billing.default_due_days must not be negative".to_string(),
            ));
        }
        if self.billing.max_retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "billing.max_retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.billing.max_retry_attempts,
            initial_delay: Duration::from_millis(self.billing.retry_initial_delay_ms),
            max_delay: Duration::from_millis(self.billing.retry_max_delay_ms),
            ..RetryConfig::default()
        }
    }
}

/// `$BILLING_CONFIG`, else `<config_dir>/freight-billing/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("freight-billing")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9090

            [billing]
            currency = "EUR"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9090);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.billing.currency, "EUR");
        assert_eq!(cfg.billing.default_due_days, 30);
        assert_eq!(cfg.logging.format, "pretty");
    }

    #[test]
    fn retry_config_follows_billing_section() {
        let mut cfg = AppConfig::default();
        cfg.billing.max_retry_attempts = 5;
        cfg.billing.retry_initial_delay_ms = 10;
        let retry = cfg.retry_config();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_delay, Duration::from_millis(10));
        assert_eq!(retry.max_delay, Duration::from_millis(1000));
    }

    #[test]
    fn zero_retry_attempts_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.billing.max_retry_attempts = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let path = Path::new("/nonexistent/freight-billing/config.toml");
        assert!(matches!(AppConfig::load(path), Err(ConfigError::NotFound(_))));
    }
}
