// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger entity types and the status/action vocabularies.
//!
//! Statuses are stored in SQLite as their snake_case text form; the strum
//! derives keep the database encoding, CLI parsing, and JSON output on a
//! single spelling. Timestamps are ISO-8601 TEXT generated in SQL.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::roles::Role;

/// The identity the surrounding (excluded) session layer supplies per
/// request. The engine never authenticates; it only authorizes against this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub actor_id: i64,
    pub role: Role,
}

/// Lifecycle status of a complaint. `Resolved` and `Rejected` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    PendingMoreInfo,
    Validated,
    InProgress,
    Escalated,
    Resolved,
    Rejected,
}

/// Status of an escalation row. At most one row per complaint is `Pending`;
/// that row is the current-assignee pointer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EscalationStatus {
    Pending,
    Escalated,
    Resolved,
}

/// Status of a decision audit row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Pending,
    Resolved,
    Escalated,
    Final,
}

/// How an escalation row came to exist, and the three workflow actions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Initial intake assignment to the front-line handler.
    Assign,
    Resolve,
    SendBack,
    Escalate,
}

/// Which prior participant a send-back should return the complaint to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SendBackTarget {
    /// The actor who created the escalation being acted on.
    Escalator,
    /// The first front-line handler, preserved across the whole chain.
    OriginalHandler,
}

/// A submitted complaint. Exactly one row per complaint; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub status: ComplaintStatus,
    /// Current front-line owner, if assigned.
    pub handler_id: Option<i64>,
    pub submitted_by: i64,
    /// Set only when the complaint is resolved.
    pub resolution: Option<String>,
    pub resolved_at: Option<String>,
    pub created_at: String,
}

/// One hop in a complaint's escalation chain. Append-only: a transition
/// resolves the old row and inserts a new one, never reassigns in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escalation {
    pub id: i64,
    pub complaint_id: i64,
    pub escalated_to: Role,
    pub escalated_to_id: i64,
    pub escalated_by_id: i64,
    /// First handler of the complaint, carried forward unchanged so a
    /// send-back can reach them after any number of hops.
    pub original_handler_id: Option<i64>,
    pub status: EscalationStatus,
    /// The action that created this row.
    pub action_type: Option<ActionType>,
    pub resolution_details: Option<String>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

/// Append-only audit record of what an actor communicated at one hop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub id: i64,
    pub complaint_id: i64,
    pub escalation_id: Option<i64>,
    pub sender_id: i64,
    /// Null for terminal resolutions.
    pub receiver_id: Option<i64>,
    pub decision_text: String,
    pub status: DecisionStatus,
    pub created_at: String,
}

/// A side-effect record for one recipient. Mutated only by the recipient
/// marking it read; the workflow engine never touches it after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub complaint_id: i64,
    pub description: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Directory entry for a role-holding account. The engine reads this to
/// resolve escalation and send-back recipients; account management belongs
/// to the excluded admin layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorAccount {
    pub id: i64,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
}

/// Executive-report side-channel record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StereotypedReport {
    pub id: i64,
    pub complaint_id: i64,
    pub handler_id: Option<i64>,
    pub recipient_id: i64,
    pub report_type: String,
    pub report_content: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn complaint_status_text_matches_ledger_encoding() {
        assert_eq!(ComplaintStatus::PendingMoreInfo.to_string(), "pending_more_info");
        assert_eq!(ComplaintStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            ComplaintStatus::from_str("resolved").unwrap(),
            ComplaintStatus::Resolved
        );
    }

    #[test]
    fn action_type_round_trips() {
        for action in [
            ActionType::Assign,
            ActionType::Resolve,
            ActionType::SendBack,
            ActionType::Escalate,
        ] {
            let text = action.to_string();
            assert_eq!(ActionType::from_str(&text).unwrap(), action);
        }
        assert_eq!(ActionType::SendBack.to_string(), "send_back");
    }

    #[test]
    fn entities_serialize_with_snake_case_statuses() {
        let decision = Decision {
            id: 1,
            complaint_id: 42,
            escalation_id: Some(7),
            sender_id: 7,
            receiver_id: None,
            decision_text: "issue fixed".to_string(),
            status: DecisionStatus::Final,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains(r#""status":"final""#));
        let parsed: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, DecisionStatus::Final);
    }
}
