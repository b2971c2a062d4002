// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision audit trail operations. Rows are append-only and never mutated.

use redress_core::RedressError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Decision, NewDecision};
use crate::queries::parse_text_enum;

const DECISION_COLS: &str =
    "id, complaint_id, escalation_id, sender_id, receiver_id, decision_text, status, created_at";

fn map_decision(row: &rusqlite::Row<'_>) -> rusqlite::Result<Decision> {
    Ok(Decision {
        id: row.get(0)?,
        complaint_id: row.get(1)?,
        escalation_id: row.get(2)?,
        sender_id: row.get(3)?,
        receiver_id: row.get(4)?,
        decision_text: row.get(5)?,
        status: parse_text_enum(6, row.get::<_, String>(6)?)?,
        created_at: row.get(7)?,
    })
}

/// Append a decision row inside an open transaction. Returns the assigned id.
pub fn insert_decision_tx(
    conn: &rusqlite::Connection,
    decision: &NewDecision,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO decisions
             (complaint_id, escalation_id, sender_id, receiver_id, decision_text, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            decision.complaint_id,
            decision.escalation_id,
            decision.sender_id,
            decision.receiver_id,
            decision.decision_text,
            decision.status.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Full decision history for a complaint, in creation order.
pub async fn list_for_complaint(
    db: &Database,
    complaint_id: i64,
) -> Result<Vec<Decision>, RedressError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DECISION_COLS} FROM decisions WHERE complaint_id = ?1 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![complaint_id], map_decision)?;
            let mut decisions = Vec::new();
            for row in rows {
                decisions.push(row?);
            }
            Ok(decisions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
