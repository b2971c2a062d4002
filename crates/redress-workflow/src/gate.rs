// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The role-capability gate.
//!
//! An actor may act on a complaint/escalation pair only while the
//! escalation is pending and assigned to exactly that actor in exactly that
//! role. Every failure mode (wrong actor, wrong role, already-resolved
//! escalation, nonexistent ids) collapses to the same `NotPermitted` answer
//! so unauthorized callers cannot probe for a complaint's existence.
//!
//! The fetch runs inside the coordinator's commit transaction, which makes
//! it double as the TOCTOU re-check: when two actors race on one pending
//! escalation, the loser's fetch finds no row.

use redress_core::types::{ActorContext, Escalation, EscalationStatus};
use redress_storage::queries::escalations;

/// Fetch the gated escalation inside an open transaction. `None` means not
/// permitted or not found; the caller must not distinguish the two.
pub fn check_tx(
    conn: &rusqlite::Connection,
    actor: ActorContext,
    complaint_id: i64,
    escalation_id: i64,
) -> rusqlite::Result<Option<Escalation>> {
    escalations::gate_pending_tx(conn, escalation_id, complaint_id, actor.role, actor.actor_id)
}

/// The pure gate predicate over an already-fetched row. The SQL in
/// [`check_tx`] encodes the same conditions; this form exists for callers
/// holding a row and for tests.
pub fn permits(escalation: &Escalation, actor: ActorContext, complaint_id: i64) -> bool {
    escalation.complaint_id == complaint_id
        && escalation.status == EscalationStatus::Pending
        && escalation.escalated_to == actor.role
        && escalation.escalated_to_id == actor.actor_id
}
