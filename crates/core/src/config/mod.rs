//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DEALSCOUT_*)
//! 2. TOML config file (if DEALSCOUT_CONFIG_FILE set)
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

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DEALSCOUT_*)
/// 2. TOML config file (if DEALSCOUT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// How long each price/review locator may wait for its element.
    ///
    /// Set via DEALSCOUT_LOCATOR_TIMEOUT_MS environment variable.
    #[serde(default = "default_locator_timeout_ms")]
    pub locator_timeout_ms: u64,

    /// How long an adapter waits for its "results loaded" marker.
    ///
    /// Set via DEALSCOUT_READY_TIMEOUT_MS environment variable.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,

    /// Hard cap on a whole search. Unset means no cap.
    ///
    /// Set via DEALSCOUT_SEARCH_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub search_timeout_ms: Option<u64>,

    /// Run the adapters concurrently, one browser session each.
    ///
    /// Set via DEALSCOUT_PARALLEL environment variable.
    #[serde(default)]
    pub parallel: bool,

    /// Where the offer table is written after a search.
    ///
    /// Set via DEALSCOUT_OUTPUT_PATH environment variable.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_locator_timeout_ms() -> u64 {
    5_000
}

fn default_ready_timeout_ms() -> u64 {
    10_000
}

fn default_output_path() -> PathBuf {
    PathBuf::from("offers.csv")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locator_timeout_ms: default_locator_timeout_ms(),
            ready_timeout_ms: default_ready_timeout_ms(),
            search_timeout_ms: None,
            parallel: false,
            output_path: default_output_path(),
        }
    }
}

impl AppConfig {
    /// Per-locator wait as Duration.
    pub fn locator_timeout(&self) -> Duration {
        Duration::from_millis(self.locator_timeout_ms)
    }

    /// Ready-marker wait as Duration.
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Search-level cap as Duration, if configured.
    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DEALSCOUT_`
    /// 2. TOML file from `DEALSCOUT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DEALSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DEALSCOUT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
