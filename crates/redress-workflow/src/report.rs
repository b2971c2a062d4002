// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The executive-report side channel.
//!
//! Reports are submitted after the workflow transaction has committed,
//! at-least-once and best-effort: a sink failure is logged and surfaced as
//! a soft warning on the outcome, never a rollback. The trait seam lets
//! deployments swap the bundled ledger-table sink for an external one.

use async_trait::async_trait;
use redress_core::RedressError;
use redress_storage::{Database, NewReport, queries::reports};

/// Destination for stereotyped executive reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn submit(&self, report: NewReport) -> Result<(), RedressError>;
}

/// Sink writing reports to the ledger's `stereotyped_reports` table.
pub struct SqliteReportSink {
    db: Database,
}

impl SqliteReportSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportSink for SqliteReportSink {
    async fn submit(&self, report: NewReport) -> Result<(), RedressError> {
        reports::insert_report(&self.db, report).await?;
        Ok(())
    }
}
