// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-diagnostic error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into config diagnostics with
//! valid key listings and "did you mean?" suggestions using Jaro-Winkler
//! string similarity.

use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `databse_path` -> `database_path`
/// while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic context.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    UnknownKey {
        /// The unrecognized key name (dotted path).
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    InvalidType {
        /// The key with the wrong type (dotted path).
        key: String,
        /// Description of the type mismatch.
        detail: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    MissingKey { key: String },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// One-line help text for the error, if any is applicable.
    pub fn help(&self) -> Option<String> {
        match self {
            ConfigError::UnknownKey {
                suggestion,
                valid_keys,
                ..
            } => Some(match suggestion {
                Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
                None => format!("valid keys: {valid_keys}"),
            }),
            ConfigError::MissingKey { key } => {
                Some(format!("add `{key} = <value>` to your redress.toml"))
            }
            _ => None,
        }
    }
}

/// Convert a Figment error (which may aggregate several failures) into a
/// list of config diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter().map(single_figment_error).collect()
}

fn single_figment_error(err: figment::Error) -> ConfigError {
    use figment::error::Kind;

    let path = err.path.join(".");
    match err.kind {
        Kind::UnknownField(ref field, expected) => {
            let key = if path.is_empty() {
                field.clone()
            } else {
                format!("{path}.{field}")
            };
            ConfigError::UnknownKey {
                key,
                suggestion: suggest(field, expected),
                valid_keys: expected.join(", "),
            }
        }
        Kind::InvalidType(ref actual, ref expected) => ConfigError::InvalidType {
            key: path,
            detail: format!("found {actual}, expected {expected}"),
        },
        Kind::MissingField(ref field) => ConfigError::MissingKey {
            key: field.to_string(),
        },
        kind => ConfigError::Other(format!("{kind} (at `{path}`)")),
    }
}

/// Pick the closest valid key by Jaro-Winkler similarity, if close enough.
fn suggest(field: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|candidate| (strsim::jaro_winkler(field, candidate), *candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Render a list of config errors to stderr, one block per error.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("error: {error}");
        if let Some(help) = error.help() {
            eprintln!("  help: {help}");
        }
    }
}
