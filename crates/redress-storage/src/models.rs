// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger model types for storage operations.
//!
//! The canonical entity types live in `redress-core::types` so the workflow
//! engine and any adapter share them. This module re-exports them and adds
//! the insert shapes the query modules accept (rows whose id and timestamps
//! the database assigns).

use redress_core::roles::Role;
use redress_core::types::{ActionType, DecisionStatus};

pub use redress_core::types::{
    ActorAccount, Complaint, Decision, Escalation, Notification, StereotypedReport,
};

/// Input shape for a new escalation row (always inserted `pending`).
#[derive(Debug, Clone)]
pub struct NewEscalation {
    pub complaint_id: i64,
    pub escalated_to: Role,
    pub escalated_to_id: i64,
    pub escalated_by_id: i64,
    pub original_handler_id: Option<i64>,
    pub action_type: ActionType,
}

/// Input shape for a new decision audit row.
#[derive(Debug, Clone)]
pub struct NewDecision {
    pub complaint_id: i64,
    pub escalation_id: Option<i64>,
    pub sender_id: i64,
    pub receiver_id: Option<i64>,
    pub decision_text: String,
    pub status: DecisionStatus,
}

/// Input shape for a new executive-report row.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub complaint_id: i64,
    pub handler_id: Option<i64>,
    pub recipient_id: i64,
    pub report_type: String,
    pub report_content: String,
}

/// A pending escalation joined with its complaint, as listed in an
/// assignee's inbox.
#[derive(Debug, Clone)]
pub struct PendingAssignment {
    pub complaint: Complaint,
    pub escalation: Escalation,
}
