// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification operations.
//!
//! The workflow coordinator inserts notification rows inside its commit
//! transaction; after that only the owning user touches them, by marking
//! them read. The mark operations filter on `user_id` so a recipient can
//! never act on someone else's rows.

use redress_core::RedressError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Notification;

const NOTIFICATION_COLS: &str = "id, user_id, complaint_id, description, is_read, created_at";

fn map_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        complaint_id: row.get(2)?,
        description: row.get(3)?,
        is_read: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Insert a notification row inside an open transaction. Returns the
/// assigned id.
pub fn insert_notification_tx(
    conn: &rusqlite::Connection,
    user_id: i64,
    complaint_id: i64,
    description: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO notifications (user_id, complaint_id, description) VALUES (?1, ?2, ?3)",
        params![user_id, complaint_id, description],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Notifications for a user, newest first, optionally unread only.
pub async fn list_for_user(
    db: &Database,
    user_id: i64,
    unread_only: bool,
) -> Result<Vec<Notification>, RedressError> {
    db.connection()
        .call(move |conn| {
            let sql = if unread_only {
                format!(
                    "SELECT {NOTIFICATION_COLS} FROM notifications
                     WHERE user_id = ?1 AND is_read = 0 ORDER BY id DESC"
                )
            } else {
                format!(
                    "SELECT {NOTIFICATION_COLS} FROM notifications
                     WHERE user_id = ?1 ORDER BY id DESC"
                )
            };
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![user_id], map_notification)?;
            let mut notifications = Vec::new();
            for row in rows {
                notifications.push(row?);
            }
            Ok(notifications)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark one of the user's notifications read. Returns the number of rows
/// touched: zero means the row does not exist or belongs to someone else.
pub async fn mark_read(
    db: &Database,
    user_id: i64,
    notification_id: i64,
) -> Result<usize, RedressError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
                params![notification_id, user_id],
            )?;
            Ok(changed)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark all of the user's notifications read. Returns the number of rows
/// touched.
pub async fn mark_all_read(db: &Database, user_id: i64) -> Result<usize, RedressError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
                params![user_id],
            )?;
            Ok(changed)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::queries::complaints;

    async fn setup_db() -> (Database, tempfile::TempDir, i64) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let complaint_id = complaints::create_complaint(&db, "Lost card", "ID card lost", None, 11)
            .await
            .unwrap();
        (db, dir, complaint_id)
    }

    async fn insert(db: &Database, user_id: i64, complaint_id: i64, text: &str) -> i64 {
        let text = text.to_string();
        db.connection()
            .call(move |conn| Ok::<_, rusqlite::Error>(insert_notification_tx(conn, user_id, complaint_id, &text)?))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn list_filters_by_user_and_read_state() {
        let (db, _dir, complaint_id) = setup_db().await;

        let n1 = insert(&db, 11, complaint_id, "your complaint was escalated").await;
        insert(&db, 3, complaint_id, "a complaint requires your attention").await;

        let all = list_for_user(&db, 11, false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, n1);
        assert!(!all[0].is_read);

        mark_read(&db, 11, n1).await.unwrap();
        assert!(list_for_user(&db, 11, true).await.unwrap().is_empty());
        assert_eq!(list_for_user(&db, 11, false).await.unwrap().len(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_read_ignores_other_users_rows() {
        let (db, _dir, complaint_id) = setup_db().await;
        let n1 = insert(&db, 11, complaint_id, "your complaint was resolved").await;

        // User 99 cannot mark user 11's notification.
        assert_eq!(mark_read(&db, 99, n1).await.unwrap(), 0);
        let rows = list_for_user(&db, 11, true).await.unwrap();
        assert_eq!(rows.len(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_all_read_touches_only_unread() {
        let (db, _dir, complaint_id) = setup_db().await;
        let n1 = insert(&db, 11, complaint_id, "one").await;
        insert(&db, 11, complaint_id, "two").await;
        insert(&db, 11, complaint_id, "three").await;

        mark_read(&db, 11, n1).await.unwrap();
        assert_eq!(mark_all_read(&db, 11).await.unwrap(), 2);
        assert!(list_for_user(&db, 11, true).await.unwrap().is_empty());

        db.close().await.unwrap();
    }
}
