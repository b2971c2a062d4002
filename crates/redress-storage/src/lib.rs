// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Redress workflow engine.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed query
//! operations for the five ledger tables (actors, complaints, escalations,
//! decisions, notifications) plus the executive-report side table.
//!
//! Each query module exposes async entry points over the shared
//! [`Database`] handle and synchronous `*_tx` variants for use inside a
//! `rusqlite` transaction, so the workflow coordinator can compose one
//! atomic unit out of reads and writes across several tables.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
