// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification recipient computation.
//!
//! One function, parameterized by action, replaces the per-role notification
//! blocks the workflow would otherwise accumulate. Recipients form a set
//! keyed by user id: each person gets at most one notification per
//! transition even when they qualify under several roles (submitter who is
//! also the escalator, escalator who is also the new assignee, and so on).

use std::collections::HashSet;

use redress_core::types::{ActionType, ActorContext, Complaint, Escalation};

use crate::machine::Recipient;

/// One (recipient, message) pair to be written inside the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub recipient_id: i64,
    pub message: String,
}

/// Compute the deduplicated notification set for a transition.
///
/// Always includes the complaint's submitter and the new assignee (if any).
/// The prior escalator is included unless they are the acting actor or the
/// new assignee. For resolve, the original front-line handler is notified
/// of closure even when they are not the current assignee. First draft wins
/// on id collisions.
pub fn compute_recipients(
    action: ActionType,
    complaint: &Complaint,
    escalation_before: &Escalation,
    actor: ActorContext,
    new_assignee: Option<Recipient>,
    reason: &str,
) -> Vec<NotificationDraft> {
    let title = complaint.title.as_str();
    let mut drafts = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |recipient_id: i64, message: String| {
        if seen.insert(recipient_id) {
            drafts.push(NotificationDraft {
                recipient_id,
                message,
            });
        }
    };

    // The submitter always hears about movement on their complaint.
    let submitter_message = match action {
        ActionType::Resolve => format!("your complaint \"{title}\" was resolved: {reason}"),
        ActionType::SendBack => {
            format!("your complaint \"{title}\" was returned to an earlier handler for more information")
        }
        ActionType::Escalate => {
            format!("your complaint \"{title}\" was escalated for further review")
        }
        ActionType::Assign => format!("your complaint \"{title}\" was assigned to a handler"),
    };
    push(complaint.submitted_by, submitter_message);

    if let Some(to) = new_assignee {
        push(
            to.actor_id,
            format!("a complaint requires your attention: \"{title}\""),
        );
    }

    // The prior escalator learns what happened to the hand-off they made,
    // unless they acted themselves or are the one receiving it back.
    let prior = escalation_before.escalated_by_id;
    if prior != actor.actor_id && Some(prior) != new_assignee.map(|to| to.actor_id) {
        let verb = match action {
            ActionType::Resolve => "resolved",
            ActionType::SendBack => "sent back for more information",
            ActionType::Escalate => "escalated further",
            ActionType::Assign => "assigned",
        };
        push(
            prior,
            format!("complaint \"{title}\" you forwarded was {verb}"),
        );
    }

    // Closure notice for the original front-line handler.
    if action == ActionType::Resolve
        && let Some(handler) = escalation_before
            .original_handler_id
            .or(complaint.handler_id)
    {
        push(
            handler,
            format!("complaint \"{title}\" you handled was closed: {reason}"),
        );
    }

    drafts
}

#[cfg(test)]
mod tests {
    use redress_core::roles::Role;
    use redress_core::types::{ComplaintStatus, EscalationStatus};

    use super::*;

    fn complaint() -> Complaint {
        Complaint {
            id: 42,
            title: "Broken portal".to_string(),
            description: "Grades page 500s".to_string(),
            category: None,
            status: ComplaintStatus::InProgress,
            handler_id: Some(2),
            submitted_by: 11,
            resolution: None,
            resolved_at: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn escalation(escalated_by: i64, original_handler: Option<i64>) -> Escalation {
        Escalation {
            id: 5,
            complaint_id: 42,
            escalated_to: Role::Sims,
            escalated_to_id: 7,
            escalated_by_id: escalated_by,
            original_handler_id: original_handler,
            status: EscalationStatus::Pending,
            action_type: None,
            resolution_details: None,
            created_at: "2026-01-02T00:00:00.000Z".to_string(),
            resolved_at: None,
        }
    }

    fn actor(id: i64, role: Role) -> ActorContext {
        ActorContext {
            actor_id: id,
            role,
        }
    }

    #[test]
    fn resolve_notifies_submitter_and_original_handler_once_each() {
        // Escalator 2 is also the original handler: one notification, not two.
        let drafts = compute_recipients(
            ActionType::Resolve,
            &complaint(),
            &escalation(2, Some(2)),
            actor(7, Role::Sims),
            None,
            "issue fixed",
        );
        let ids: Vec<i64> = drafts.iter().map(|d| d.recipient_id).collect();
        assert_eq!(ids, vec![11, 2]);
        assert!(drafts[0].message.contains("was resolved"));
    }

    #[test]
    fn escalate_notifies_submitter_assignee_and_prior() {
        let drafts = compute_recipients(
            ActionType::Escalate,
            &complaint(),
            &escalation(2, Some(2)),
            actor(7, Role::Sims),
            Some(Recipient {
                role: Role::CampusRegistrar,
                actor_id: 3,
            }),
            "needs registrar",
        );
        let ids: Vec<i64> = drafts.iter().map(|d| d.recipient_id).collect();
        assert_eq!(ids, vec![11, 3, 2]);
        assert!(drafts[1].message.contains("requires your attention"));
        assert!(drafts[2].message.contains("escalated further"));
    }

    #[test]
    fn acting_escalator_is_not_notified_about_their_own_action() {
        // Actor 7 acts on an escalation they themselves created.
        let drafts = compute_recipients(
            ActionType::Escalate,
            &complaint(),
            &escalation(7, Some(2)),
            actor(7, Role::Sims),
            Some(Recipient {
                role: Role::CampusRegistrar,
                actor_id: 3,
            }),
            "needs registrar",
        );
        let ids: Vec<i64> = drafts.iter().map(|d| d.recipient_id).collect();
        assert_eq!(ids, vec![11, 3]);
    }

    #[test]
    fn send_back_to_escalator_does_not_double_notify_them() {
        // Escalator 2 is the new assignee: they get the assignee message only.
        let drafts = compute_recipients(
            ActionType::SendBack,
            &complaint(),
            &escalation(2, Some(2)),
            actor(7, Role::Sims),
            Some(Recipient {
                role: Role::Handler,
                actor_id: 2,
            }),
            "need the room number",
        );
        let ids: Vec<i64> = drafts.iter().map(|d| d.recipient_id).collect();
        assert_eq!(ids, vec![11, 2]);
        assert!(drafts[1].message.contains("requires your attention"));
    }
}
