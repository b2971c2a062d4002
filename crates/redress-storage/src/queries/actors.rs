// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Actor directory operations.
//!
//! The workflow engine only reads this table (to resolve escalation and
//! send-back recipients); the write operations serve the excluded
//! intake/admin layers and tests.

use redress_core::RedressError;
use redress_core::roles::Role;
use rusqlite::params;

use crate::database::Database;
use crate::models::ActorAccount;
use crate::queries::parse_text_enum;

fn map_actor(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActorAccount> {
    Ok(ActorAccount {
        id: row.get(0)?,
        display_name: row.get(1)?,
        role: parse_text_enum(2, row.get::<_, String>(2)?)?,
        is_active: row.get(3)?,
    })
}

/// Fetch an actor account inside an open transaction.
pub fn get_actor_tx(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<ActorAccount>> {
    let mut stmt =
        conn.prepare("SELECT id, display_name, role, is_active FROM actors WHERE id = ?1")?;
    match stmt.query_row(params![id], map_actor) {
        Ok(actor) => Ok(Some(actor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Create an actor account. Returns the assigned id.
pub async fn create_actor(
    db: &Database,
    display_name: &str,
    role: Role,
) -> Result<i64, RedressError> {
    let display_name = display_name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO actors (display_name, role) VALUES (?1, ?2)",
                params![display_name, role.to_string()],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an actor account by id.
pub async fn get_actor(db: &Database, id: i64) -> Result<Option<ActorAccount>, RedressError> {
    db.connection()
        .call(move |conn| Ok(get_actor_tx(conn, id)?))
        .await
        .map_err(crate::database::map_tr_err)
}

/// Activate or deactivate an account. Deactivated accounts are never
/// resolved as transition recipients.
pub async fn set_active(db: &Database, id: i64, active: bool) -> Result<(), RedressError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE actors SET is_active = ?1 WHERE id = ?2",
                params![active, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
