// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalation chain operations.
//!
//! Escalation rows are append-only: a transition resolves the old pending
//! row and inserts a new one. A partial unique index in the schema enforces
//! the "at most one pending row per complaint" invariant at the database
//! level as well.

use redress_core::RedressError;
use redress_core::roles::Role;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Escalation, NewEscalation, PendingAssignment};
use crate::queries::parse_text_enum;

const ESCALATION_COLS: &str = "id, complaint_id, escalated_to, escalated_to_id, escalated_by_id, \
                               original_handler_id, status, action_type, resolution_details, \
                               created_at, resolved_at";

pub(crate) fn map_escalation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Escalation> {
    Ok(Escalation {
        id: row.get(0)?,
        complaint_id: row.get(1)?,
        escalated_to: parse_text_enum(2, row.get::<_, String>(2)?)?,
        escalated_to_id: row.get(3)?,
        escalated_by_id: row.get(4)?,
        original_handler_id: row.get(5)?,
        status: parse_text_enum(6, row.get::<_, String>(6)?)?,
        action_type: row
            .get::<_, Option<String>>(7)?
            .map(|text| parse_text_enum(7, text))
            .transpose()?,
        resolution_details: row.get(8)?,
        created_at: row.get(9)?,
        resolved_at: row.get(10)?,
    })
}

/// Fetch an escalation inside an open transaction.
pub fn get_escalation_tx(
    conn: &rusqlite::Connection,
    id: i64,
) -> rusqlite::Result<Option<Escalation>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {ESCALATION_COLS} FROM escalations WHERE id = ?1"))?;
    match stmt.query_row(params![id], map_escalation) {
        Ok(escalation) => Ok(Some(escalation)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// The gate query: fetch the escalation only if it is pending, belongs to
/// the given complaint, and is assigned to exactly this actor in exactly
/// this role. Any mismatch returns `None`.
///
/// Run inside the commit transaction, this doubles as the TOCTOU re-check:
/// the loser of a race on the same escalation sees no row here.
pub fn gate_pending_tx(
    conn: &rusqlite::Connection,
    escalation_id: i64,
    complaint_id: i64,
    role: Role,
    actor_id: i64,
) -> rusqlite::Result<Option<Escalation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ESCALATION_COLS} FROM escalations
         WHERE id = ?1 AND complaint_id = ?2 AND status = 'pending'
           AND escalated_to = ?3 AND escalated_to_id = ?4"
    ))?;
    match stmt.query_row(
        params![escalation_id, complaint_id, role.to_string(), actor_id],
        map_escalation,
    ) {
        Ok(escalation) => Ok(Some(escalation)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolve a pending escalation inside an open transaction, recording the
/// audit string and the resolution timestamp.
pub fn resolve_escalation_tx(
    conn: &rusqlite::Connection,
    id: i64,
    resolution_details: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE escalations SET status = 'resolved', resolution_details = ?1,
         resolved_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE id = ?2",
        params![resolution_details, id],
    )
}

/// Insert a new pending escalation inside an open transaction. Returns the
/// assigned id.
pub fn insert_escalation_tx(
    conn: &rusqlite::Connection,
    escalation: &NewEscalation,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO escalations
             (complaint_id, escalated_to, escalated_to_id, escalated_by_id,
              original_handler_id, status, action_type)
         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
        params![
            escalation.complaint_id,
            escalation.escalated_to.to_string(),
            escalation.escalated_to_id,
            escalation.escalated_by_id,
            escalation.original_handler_id,
            escalation.action_type.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Number of pending escalation rows for a complaint, inside an open
/// transaction.
pub fn count_pending_tx(conn: &rusqlite::Connection, complaint_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM escalations WHERE complaint_id = ?1 AND status = 'pending'",
        params![complaint_id],
        |row| row.get(0),
    )
}

/// Insert a new pending escalation (intake assignment path).
pub async fn insert_escalation(
    db: &Database,
    escalation: NewEscalation,
) -> Result<i64, RedressError> {
    db.connection()
        .call(move |conn| Ok(insert_escalation_tx(conn, &escalation)?))
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an escalation by id.
pub async fn get_escalation(db: &Database, id: i64) -> Result<Option<Escalation>, RedressError> {
    db.connection()
        .call(move |conn| Ok(get_escalation_tx(conn, id)?))
        .await
        .map_err(crate::database::map_tr_err)
}

/// Full escalation history for a complaint, in creation order.
pub async fn list_for_complaint(
    db: &Database,
    complaint_id: i64,
) -> Result<Vec<Escalation>, RedressError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ESCALATION_COLS} FROM escalations
                 WHERE complaint_id = ?1 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![complaint_id], map_escalation)?;
            let mut escalations = Vec::new();
            for row in rows {
                escalations.push(row?);
            }
            Ok(escalations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of pending escalation rows for a complaint (0 or 1 by invariant).
pub async fn count_pending(db: &Database, complaint_id: i64) -> Result<i64, RedressError> {
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM escalations WHERE complaint_id = ?1 AND status = 'pending'",
                params![complaint_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The inbox: pending escalations assigned to this (role, actor) pair,
/// joined with their complaints, oldest first.
pub async fn list_pending_assigned(
    db: &Database,
    role: Role,
    actor_id: i64,
) -> Result<Vec<PendingAssignment>, RedressError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.title, c.description, c.category, c.status, c.handler_id,
                        c.submitted_by, c.resolution, c.resolved_at, c.created_at,
                        e.id, e.complaint_id, e.escalated_to, e.escalated_to_id,
                        e.escalated_by_id, e.original_handler_id, e.status, e.action_type,
                        e.resolution_details, e.created_at, e.resolved_at
                 FROM escalations e
                 JOIN complaints c ON c.id = e.complaint_id
                 WHERE e.status = 'pending' AND e.escalated_to = ?1 AND e.escalated_to_id = ?2
                 ORDER BY e.created_at ASC",
            )?;
            let rows = stmt.query_map(params![role.to_string(), actor_id], |row| {
                let complaint = crate::queries::complaints::map_complaint(row)?;
                Ok(PendingAssignment {
                    complaint,
                    escalation: Escalation {
                        id: row.get(10)?,
                        complaint_id: row.get(11)?,
                        escalated_to: parse_text_enum(12, row.get::<_, String>(12)?)?,
                        escalated_to_id: row.get(13)?,
                        escalated_by_id: row.get(14)?,
                        original_handler_id: row.get(15)?,
                        status: parse_text_enum(16, row.get::<_, String>(16)?)?,
                        action_type: row
                            .get::<_, Option<String>>(17)?
                            .map(|text| parse_text_enum(17, text))
                            .transpose()?,
                        resolution_details: row.get(18)?,
                        created_at: row.get(19)?,
                        resolved_at: row.get(20)?,
                    },
                })
            })?;
            let mut assignments = Vec::new();
            for row in rows {
                assignments.push(row?);
            }
            Ok(assignments)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use redress_core::types::{ActionType, EscalationStatus};
    use tempfile::tempdir;

    use super::*;
    use crate::queries::complaints;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    async fn seed_complaint(db: &Database) -> i64 {
        complaints::create_complaint(db, "Noise", "Dorm noise at night", None, 11)
            .await
            .unwrap()
    }

    fn assignment(complaint_id: i64, to: Role, to_id: i64, by_id: i64) -> NewEscalation {
        NewEscalation {
            complaint_id,
            escalated_to: to,
            escalated_to_id: to_id,
            escalated_by_id: by_id,
            original_handler_id: Some(by_id),
            action_type: ActionType::Assign,
        }
    }

    #[tokio::test]
    async fn insert_and_get_escalation_roundtrips() {
        let (db, _dir) = setup_db().await;
        let complaint_id = seed_complaint(&db).await;

        let id = insert_escalation(&db, assignment(complaint_id, Role::Sims, 7, 2))
            .await
            .unwrap();
        let escalation = get_escalation(&db, id).await.unwrap().unwrap();
        assert_eq!(escalation.complaint_id, complaint_id);
        assert_eq!(escalation.escalated_to, Role::Sims);
        assert_eq!(escalation.escalated_to_id, 7);
        assert_eq!(escalation.status, EscalationStatus::Pending);
        assert_eq!(escalation.action_type, Some(ActionType::Assign));
        assert_eq!(escalation.original_handler_id, Some(2));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_pending_row_for_same_complaint_is_rejected() {
        let (db, _dir) = setup_db().await;
        let complaint_id = seed_complaint(&db).await;

        insert_escalation(&db, assignment(complaint_id, Role::Sims, 7, 2))
            .await
            .unwrap();
        let second = insert_escalation(&db, assignment(complaint_id, Role::Finance, 8, 2)).await;
        assert!(second.is_err(), "unique pending index must reject this");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn gate_matches_only_exact_assignee() {
        let (db, _dir) = setup_db().await;
        let complaint_id = seed_complaint(&db).await;
        let id = insert_escalation(&db, assignment(complaint_id, Role::Sims, 7, 2))
            .await
            .unwrap();

        let hit = db
            .connection()
            .call(move |conn| Ok::<_, rusqlite::Error>(gate_pending_tx(conn, id, complaint_id, Role::Sims, 7)?))
            .await
            .unwrap();
        assert!(hit.is_some());

        // Wrong actor, wrong role, wrong complaint: all fail closed.
        for (role, actor, complaint) in [
            (Role::Sims, 9, complaint_id),
            (Role::Finance, 7, complaint_id),
            (Role::Sims, 7, complaint_id + 1),
        ] {
            let miss = db
                .connection()
                .call(move |conn| Ok::<_, rusqlite::Error>(gate_pending_tx(conn, id, complaint, role, actor)?))
                .await
                .unwrap();
            assert!(miss.is_none());
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn resolve_then_insert_keeps_chain_in_order() {
        let (db, _dir) = setup_db().await;
        let complaint_id = seed_complaint(&db).await;
        let first = insert_escalation(&db, assignment(complaint_id, Role::Sims, 7, 2))
            .await
            .unwrap();

        db.connection()
            .call(move |conn| {
                resolve_escalation_tx(conn, first, "escalated to campus_registrar #3")?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();
        insert_escalation(
            &db,
            NewEscalation {
                complaint_id,
                escalated_to: Role::CampusRegistrar,
                escalated_to_id: 3,
                escalated_by_id: 7,
                original_handler_id: Some(2),
                action_type: ActionType::Escalate,
            },
        )
        .await
        .unwrap();

        let chain = list_for_complaint(&db, complaint_id).await.unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].status, EscalationStatus::Resolved);
        assert!(chain[0].resolved_at.is_some());
        assert_eq!(chain[1].status, EscalationStatus::Pending);
        assert_eq!(chain[1].escalated_to, Role::CampusRegistrar);
        assert_eq!(count_pending(&db, complaint_id).await.unwrap(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn inbox_lists_only_own_pending_rows() {
        let (db, _dir) = setup_db().await;
        let c1 = seed_complaint(&db).await;
        let c2 = complaints::create_complaint(&db, "Fees", "Double charge", None, 12)
            .await
            .unwrap();

        insert_escalation(&db, assignment(c1, Role::Sims, 7, 2))
            .await
            .unwrap();
        insert_escalation(&db, assignment(c2, Role::Sims, 9, 2))
            .await
            .unwrap();

        let inbox = list_pending_assigned(&db, Role::Sims, 7).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].complaint.id, c1);
        assert_eq!(inbox[0].escalation.escalated_to_id, 7);

        assert!(
            list_pending_assigned(&db, Role::Finance, 7)
                .await
                .unwrap()
                .is_empty()
        );

        db.close().await.unwrap();
    }
}
