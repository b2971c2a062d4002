// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complaint row operations.
//!
//! A complaint is created once by intake and afterwards mutated only by the
//! workflow coordinator inside its commit transaction, which is why the
//! mutating operations here are `*_tx` variants.

use redress_core::RedressError;
use redress_core::types::ComplaintStatus;
use rusqlite::params;

use crate::database::Database;
use crate::models::Complaint;
use crate::queries::parse_text_enum;

const COMPLAINT_COLS: &str = "id, title, description, category, status, handler_id, \
                              submitted_by, resolution, resolved_at, created_at";

pub(crate) fn map_complaint(row: &rusqlite::Row<'_>) -> rusqlite::Result<Complaint> {
    Ok(Complaint {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        status: parse_text_enum(4, row.get::<_, String>(4)?)?,
        handler_id: row.get(5)?,
        submitted_by: row.get(6)?,
        resolution: row.get(7)?,
        resolved_at: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Fetch a complaint inside an open transaction.
pub fn get_complaint_tx(
    conn: &rusqlite::Connection,
    id: i64,
) -> rusqlite::Result<Option<Complaint>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COMPLAINT_COLS} FROM complaints WHERE id = ?1"))?;
    match stmt.query_row(params![id], map_complaint) {
        Ok(complaint) => Ok(Some(complaint)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Update a complaint's status inside an open transaction.
pub fn set_status_tx(
    conn: &rusqlite::Connection,
    id: i64,
    status: ComplaintStatus,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE complaints SET status = ?1 WHERE id = ?2",
        params![status.to_string(), id],
    )
}

/// Mark a complaint resolved inside an open transaction: terminal status,
/// resolution text, and resolution timestamp in one write.
pub fn resolve_tx(conn: &rusqlite::Connection, id: i64, resolution: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE complaints SET status = ?1, resolution = ?2,
         resolved_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE id = ?3",
        params![ComplaintStatus::Resolved.to_string(), resolution, id],
    )
}

/// Set the front-line handler inside an open transaction (intake assignment).
pub fn set_handler_tx(
    conn: &rusqlite::Connection,
    id: i64,
    handler_id: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE complaints SET handler_id = ?1 WHERE id = ?2",
        params![handler_id, id],
    )
}

/// Create a complaint (intake). Returns the assigned id.
pub async fn create_complaint(
    db: &Database,
    title: &str,
    description: &str,
    category: Option<&str>,
    submitted_by: i64,
) -> Result<i64, RedressError> {
    let title = title.to_string();
    let description = description.to_string();
    let category = category.map(|c| c.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO complaints (title, description, category, submitted_by)
                 VALUES (?1, ?2, ?3, ?4)",
                params![title, description, category, submitted_by],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a complaint by id.
pub async fn get_complaint(db: &Database, id: i64) -> Result<Option<Complaint>, RedressError> {
    db.connection()
        .call(move |conn| Ok(get_complaint_tx(conn, id)?))
        .await
        .map_err(crate::database::map_tr_err)
}
