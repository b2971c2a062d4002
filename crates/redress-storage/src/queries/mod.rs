// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the ledger tables.
//!
//! Async functions take `&Database` and go through the single writer;
//! `*_tx` functions take a `&rusqlite::Connection` so the workflow
//! coordinator can compose them inside one transaction.

pub mod actors;
pub mod complaints;
pub mod decisions;
pub mod escalations;
pub mod notifications;
pub mod reports;

/// Parse a TEXT column into a strum-derived enum, mapping parse failures to
/// a rusqlite conversion error carrying the column index.
pub(crate) fn parse_text_enum<T>(idx: usize, text: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
