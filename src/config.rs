//! Configuration module
//!
//! Loads `AppConfig` from a TOML file (default `~/.config/salon-booking/
//! config.toml`, overridable via `BOOKING_CONFIG`); every section falls back
//! to defaults so a missing file still yields a runnable dev setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub booking: BookingConfig,
    pub fees: FeesSection,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

/// Database configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./booking.db?mode=rwc".to_string(),
        }
    }
}

impl DatabaseSection {
    /// `DATABASE_URL` wins over the config file.
    pub fn connection_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.url.clone())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter (overridable via `RUST_LOG`)
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Booking policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Deposit collected on every reservation, minor currency units
    pub deposit_minor: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Check-in permitted within this many minutes of the scheduled time
    pub check_in_window_minutes: i64,
    /// How often the reminder scheduler runs, in seconds
    pub reminder_interval_secs: u64,
    /// Upper bound on a compensation refund attempt, in seconds
    pub refund_timeout_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            deposit_minor: 5_000,
            currency: "usd".to_string(),
            check_in_window_minutes: 30,
            reminder_interval_secs: 3600,
            refund_timeout_secs: 10,
        }
    }
}

/// Gateway processing-fee section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeesSection {
    /// Percentage part in basis points (290 = 2.9%)
    pub card_percent_bps: i64,
    /// Fixed part in minor currency units
    pub card_fixed_minor: i64,
}

impl Default for FeesSection {
    fn default() -> Self {
        Self {
            card_percent_bps: 290,
            card_fixed_minor: 30,
        }
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("salon-booking")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_runnable() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.booking.deposit_minor, 5_000);
        assert_eq!(cfg.booking.check_in_window_minutes, 30);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [booking]
            deposit_minor = 7500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.booking.deposit_minor, 7_500);
        assert_eq!(cfg.booking.currency, "usd");
        assert_eq!(cfg.server.port, 8080);
    }
}
