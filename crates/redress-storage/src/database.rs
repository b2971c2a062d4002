// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread; the `Database` struct IS the single writer. Do NOT create
//! additional Connection instances for writes. Query modules accept
//! `&Database` and call through `connection().call()`.

use redress_core::RedressError;

/// Handle to the ledger database.
///
/// Wraps a single `tokio_rusqlite::Connection`. Opening runs the PRAGMA
/// setup and all pending migrations before the handle is returned. Clones
/// share the one background writer thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if necessary) the ledger at `path` and migrate it.
    ///
    /// `synchronous=FULL` keeps commits durable before control returns to
    /// the caller; the workflow contract promises exactly that.
    pub async fn open(path: &str) -> Result<Self, RedressError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        conn.call(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "FULL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(crate::migrations::run_migrations)
            .await
            .map_err(|e| RedressError::Storage {
                source: Box::new(e),
            })?;

        tracing::debug!(path, "ledger opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection (the single writer).
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), RedressError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the crate-wide storage error.
pub fn map_tr_err(err: tokio_rusqlite::Error) -> RedressError {
    RedressError::Storage {
        source: Box::new(err),
    }
}
