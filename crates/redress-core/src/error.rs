// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Redress workflow engine.

use thiserror::Error;

/// The primary error type used across the storage layer and the workflow engine.
#[derive(Debug, Error)]
pub enum RedressError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request payload errors (empty or oversized reason text, missing or
    /// disallowed escalation target). Rejected before any row is touched.
    #[error("validation error: {0}")]
    Validation(String),

    /// The actor may not act on this complaint/escalation pair, or the pair
    /// does not exist. The two cases are deliberately indistinguishable so
    /// the existence of a complaint is never leaked to unauthorized actors.
    #[error("not permitted or not found")]
    NotPermitted,

    /// An escalate/send-back could not resolve a valid recipient account.
    /// There is no implicit default recipient; this is always a hard error.
    #[error("no valid recipient available: {0}")]
    NoRecipientAvailable(String),

    /// Storage backend errors (connection, query failure, failed commit).
    /// The whole transaction has been rolled back when this surfaces.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A best-effort side channel (executive report) failed. Never rolls
    /// back a committed transition; surfaced as a soft warning.
    #[error("report channel error: {0}")]
    SideChannel(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
