//! Application configuration and per-invocation settings.
//!
//! `AppConfig` is plain data loaded from TOML (or defaulted). It never holds
//! the API credential: that lives only in [`Settings`] for the duration of a
//! process and is not serialized.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradeplan_core::data::{
    DEFAULT_EXCHANGE_SUFFIX, DEFAULT_YAHOO_BASE_URL, DEFAULT_YAHOO_COOKIE_URL,
};
use tradeplan_core::indicators::DEFAULT_SR_WINDOW;
use tradeplan_core::narrative::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use tradeplan_core::prompt::StrategyMode;

/// Errors from loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Yahoo Finance endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub base_url: String,
    /// Host that issues the session cookie for the fundamentals crumb.
    pub cookie_url: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            cookie_url: DEFAULT_YAHOO_COOKIE_URL.to_string(),
        }
    }
}

/// Gemini endpoint and model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

/// Serializable application configuration.
///
/// Every field has a default, so a partial TOML file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Exchange suffix appended to bare tickers (e.g. ".JK").
    pub exchange_suffix: String,
    /// Symbols checked by `scan` when none are given.
    pub watchlist: Vec<String>,
    /// Strategy used when `analyze` is run without `--mode`.
    pub default_mode: StrategyMode,
    /// History fetched for a detail analysis.
    pub lookback_months: u32,
    /// Trailing bars used for support/resistance.
    pub sr_window: usize,
    /// Where saved artifacts go.
    pub output_dir: PathBuf,
    pub yahoo: YahooConfig,
    pub gemini: GeminiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exchange_suffix: DEFAULT_EXCHANGE_SUFFIX.to_string(),
            watchlist: ["BBCA", "BBRI", "BMRI", "TLKM", "ASII"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_mode: StrategyMode::default(),
            lookback_months: 6,
            sr_window: DEFAULT_SR_WINDOW,
            output_dir: PathBuf::from("."),
            yahoo: YahooConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config as TOML, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_months == 0 {
            return Err(ConfigError::Invalid("lookback_months must be >= 1".into()));
        }
        if self.sr_window == 0 {
            return Err(ConfigError::Invalid("sr_window must be >= 1".into()));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::Invalid("gemini.model must not be empty".into()));
        }
        if self.watchlist.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("watchlist contains an empty symbol".into()));
        }
        Ok(())
    }
}

/// Read-only inputs for one pipeline invocation: configuration plus credential.
pub struct Settings {
    pub config: AppConfig,
    pub api_key: Option<SecretString>,
}

impl Settings {
    /// A blank or whitespace-only key counts as missing.
    pub fn new(config: AppConfig, api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::new(k.into()));
        Self { config, api_key }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("config", &self.config)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_idx() {
        let config = AppConfig::default();
        assert_eq!(config.exchange_suffix, ".JK");
        assert_eq!(config.lookback_months, 6);
        assert_eq!(config.sr_window, 20);
        assert_eq!(config.watchlist.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            watchlist = ["GOTO", "ANTM"]
            default_mode = "conservative"

            [gemini]
            model = "gemini-2.5-flash"
            "#,
        )
        .unwrap();
        assert_eq!(config.watchlist, vec!["GOTO", "ANTM"]);
        assert_eq!(config.default_mode, StrategyMode::Conservative);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.exchange_suffix, ".JK");
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig::default();
        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_zero_window() {
        let err = AppConfig::from_toml("sr_window = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(
            AppConfig::from_toml("watchlist = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn blank_api_key_is_missing() {
        assert!(Settings::new(AppConfig::default(), Some("   ".into()))
            .api_key
            .is_none());
        assert!(Settings::new(AppConfig::default(), Some("k".into()))
            .api_key
            .is_some());
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = Settings::new(AppConfig::default(), Some("super-secret".into()));
        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
