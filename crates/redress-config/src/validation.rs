// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and sane reason-length bounds.

use crate::diagnostic::ConfigError;
use crate::model::RedressConfig;

/// Upper bound on `workflow.max_reason_chars`. Reason text is audit prose,
/// not document storage.
const MAX_REASON_CEILING: usize = 65536;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RedressConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.workflow.max_reason_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "workflow.max_reason_chars must be at least 1".to_string(),
        });
    }

    if config.workflow.max_reason_chars > MAX_REASON_CEILING {
        errors.push(ConfigError::Validation {
            message: format!(
                "workflow.max_reason_chars must be at most {MAX_REASON_CEILING}, got {}",
                config.workflow.max_reason_chars
            ),
        });
    }

    let level = config.service.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of trace, debug, info, warn, error; got `{level}`"
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RedressConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_rejected() {
        let mut config = RedressConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("database_path")));
    }

    #[test]
    fn zero_reason_length_rejected() {
        let mut config = RedressConfig::default();
        config.workflow.max_reason_chars = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bogus_log_level_rejected() {
        let mut config = RedressConfig::default();
        config.service.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
