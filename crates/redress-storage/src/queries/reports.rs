// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executive-report side table operations.
//!
//! Reports are written post-commit by the report sink, never inside the
//! workflow transaction: a failure here must not roll back a transition.

use redress_core::RedressError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{NewReport, StereotypedReport};

const REPORT_COLS: &str =
    "id, complaint_id, handler_id, recipient_id, report_type, report_content, created_at";

fn map_report(row: &rusqlite::Row<'_>) -> rusqlite::Result<StereotypedReport> {
    Ok(StereotypedReport {
        id: row.get(0)?,
        complaint_id: row.get(1)?,
        handler_id: row.get(2)?,
        recipient_id: row.get(3)?,
        report_type: row.get(4)?,
        report_content: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert an executive report. Returns the assigned id.
pub async fn insert_report(db: &Database, report: NewReport) -> Result<i64, RedressError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO stereotyped_reports
                     (complaint_id, handler_id, recipient_id, report_type, report_content)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    report.complaint_id,
                    report.handler_id,
                    report.recipient_id,
                    report.report_type,
                    report.report_content,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Reports filed for a complaint, in creation order.
pub async fn list_for_complaint(
    db: &Database,
    complaint_id: i64,
) -> Result<Vec<StereotypedReport>, RedressError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REPORT_COLS} FROM stereotyped_reports
                 WHERE complaint_id = ?1 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![complaint_id], map_report)?;
            let mut reports = Vec::new();
            for row in rows {
                reports.push(row?);
            }
            Ok(reports)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::queries::complaints;

    #[tokio::test]
    async fn insert_and_list_reports() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let complaint_id =
            complaints::create_complaint(&db, "Transcript delay", "Six weeks late", None, 11)
                .await
                .unwrap();

        insert_report(
            &db,
            NewReport {
                complaint_id,
                handler_id: Some(2),
                recipient_id: 5,
                report_type: "escalation_report".to_string(),
                report_content: "escalated to academic_vp #5".to_string(),
            },
        )
        .await
        .unwrap();

        let reports = list_for_complaint(&db, complaint_id).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].recipient_id, 5);
        assert_eq!(reports[0].report_type, "escalation_report");

        db.close().await.unwrap();
    }
}
