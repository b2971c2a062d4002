// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Redress workflow engine.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and diagnostic error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use redress_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("ledger at: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::RedressConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to diagnostics with typo suggestions
pub fn load_and_validate() -> Result<RedressConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<RedressConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_file() {
        let config = load_and_validate_str("").unwrap();
        assert_eq!(config.service.name, "redress");
        assert_eq!(config.workflow.max_reason_chars, 2000);
        assert!(config.workflow.executive_reports);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_and_validate_str(
            r#"
            [storage]
            database_path = "/var/lib/redress/ledger.db"

            [workflow]
            max_reason_chars = 500
            executive_reports = false
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.database_path, "/var/lib/redress/ledger.db");
        assert_eq!(config.workflow.max_reason_chars, 500);
        assert!(!config.workflow.executive_reports);
    }

    #[test]
    fn unknown_key_produces_suggestion() {
        let errors = load_and_validate_str(
            r#"
            [storage]
            databse_path = "x.db"
            "#,
        )
        .unwrap_err();
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(
            rendered.iter().any(|m| m.contains("databse_path")),
            "expected unknown-key error, got: {rendered:?}"
        );
    }

    #[test]
    fn semantic_validation_runs_after_parse() {
        let errors = load_and_validate_str(
            r#"
            [workflow]
            max_reason_chars = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(errors[0], ConfigError::Validation { .. }));
    }
}
