// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./redress.toml` > `~/.config/redress/redress.toml`
//! > `/etc/redress/redress.toml` with environment variable overrides via the
//! `REDRESS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RedressConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/redress/redress.toml` (system-wide)
/// 3. `~/.config/redress/redress.toml` (user XDG config)
/// 4. `./redress.toml` (local directory)
/// 5. `REDRESS_*` environment variables
pub fn load_config() -> Result<RedressConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RedressConfig::default()))
        .merge(Toml::file("/etc/redress/redress.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("redress/redress.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("redress.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<RedressConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RedressConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RedressConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RedressConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `REDRESS_WORKFLOW_MAX_REASON_CHARS` must
/// map to `workflow.max_reason_chars`, not `workflow.max.reason.chars`.
fn env_provider() -> Env {
    Env::prefixed("REDRESS_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("workflow_", "workflow.", 1);
        mapped.into()
    })
}
