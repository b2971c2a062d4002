// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Redress workflow engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Redress configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedressConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Ledger storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Workflow engine settings.
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

/// Ledger storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite ledger database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Workflow engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Maximum length in characters of the free-text reason accompanying a
    /// transition. Longer reasons are rejected before any row is touched.
    #[serde(default = "default_max_reason_chars")]
    pub max_reason_chars: usize,

    /// Whether upper-tier transitions emit executive reports through the
    /// side channel.
    #[serde(default = "default_executive_reports")]
    pub executive_reports: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_reason_chars: default_max_reason_chars(),
            executive_reports: default_executive_reports(),
        }
    }
}

fn default_service_name() -> String {
    "redress".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_path() -> String {
    "redress.db".to_string()
}

fn default_max_reason_chars() -> usize {
    2000
}

fn default_executive_reports() -> bool {
    true
}
