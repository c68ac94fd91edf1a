//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `locator_timeout_ms` is outside 100ms..=60s
    /// - `ready_timeout_ms` is outside 100ms..=2 minutes
    /// - `search_timeout_ms` is shorter than one locator wait or exceeds 10 minutes
    /// - `output_path` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locator_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "locator_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.locator_timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "locator_timeout_ms".into(),
                reason: "must not exceed 60000ms".into(),
            });
        }

        if self.ready_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "ready_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.ready_timeout_ms > 120_000 {
            return Err(ConfigError::Invalid {
                field: "ready_timeout_ms".into(),
                reason: "must not exceed 2 minutes (120000ms)".into(),
            });
        }

        if let Some(search_timeout_ms) = self.search_timeout_ms {
            if search_timeout_ms < self.locator_timeout_ms {
                return Err(ConfigError::Invalid {
                    field: "search_timeout_ms".into(),
                    reason: "must not be shorter than locator_timeout_ms".into(),
                });
            }
            if search_timeout_ms > 600_000 {
                return Err(ConfigError::Invalid {
                    field: "search_timeout_ms".into(),
                    reason: "must not exceed 10 minutes (600000ms)".into(),
                });
            }
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "output_path".into(), reason: "must not be empty".into() });
        }

        if self.parallel && self.search_timeout_ms.is_none() {
            tracing::debug!("parallel mode without search_timeout_ms; each adapter is bounded only by its own waits");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_locator_timeout_too_small() {
        let config = AppConfig { locator_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "locator_timeout_ms"));
    }

    #[test]
    fn test_validate_locator_timeout_exceeds_limit() {
        let config = AppConfig { locator_timeout_ms: 60_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "locator_timeout_ms"));
    }

    #[test]
    fn test_validate_ready_timeout_bounds() {
        let low = AppConfig { ready_timeout_ms: 99, ..Default::default() };
        assert!(matches!(low.validate(), Err(ConfigError::Invalid { field, .. }) if field == "ready_timeout_ms"));

        let high = AppConfig { ready_timeout_ms: 120_001, ..Default::default() };
        assert!(matches!(high.validate(), Err(ConfigError::Invalid { field, .. }) if field == "ready_timeout_ms"));
    }

    #[test]
    fn test_validate_search_timeout_shorter_than_locator() {
        let config = AppConfig { locator_timeout_ms: 5_000, search_timeout_ms: Some(1_000), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "search_timeout_ms"));
    }

    #[test]
    fn test_validate_search_timeout_exceeds_limit() {
        let config = AppConfig { search_timeout_ms: Some(600_001), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "search_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_output_path() {
        let config = AppConfig { output_path: PathBuf::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "output_path"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            locator_timeout_ms: 100,
            ready_timeout_ms: 100,
            search_timeout_ms: Some(100),
            ..Default::default()
        }; // minimum valid values
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config = AppConfig {
            locator_timeout_ms: 60_000,
            ready_timeout_ms: 120_000,
            search_timeout_ms: Some(600_000),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
