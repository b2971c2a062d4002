// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The escalation state machine.
//!
//! [`plan_transition`] is a pure function: given the complaint, its pending
//! escalation, the acting actor, and the (already resolved) recipient, it
//! computes a declarative [`TransitionPlan`] (which rows to update, insert,
//! and notify) with no side effects. The coordinator in [`crate::engine`]
//! executes the plan inside one transaction.

use redress_core::roles::Role;
use redress_core::types::{
    ActionType, ActorContext, Complaint, ComplaintStatus, DecisionStatus, Escalation,
    SendBackTarget,
};
use redress_core::RedressError;
use redress_storage::{NewDecision, NewEscalation, NewReport};

use crate::dispatch::{self, NotificationDraft};

/// One of the three workflow actions, with its action-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Close the complaint with the reason as resolution text.
    Resolve,
    /// Return the complaint to a prior participant. `target` selects which;
    /// `None` tries the immediate escalator, then the original handler.
    SendBack { target: Option<SendBackTarget> },
    /// Hand the complaint up the ladder to a specific role-holder.
    Escalate { target_role: Role, target_actor_id: i64 },
}

impl WorkflowAction {
    /// The action-type tag recorded on ledger rows.
    pub fn action_type(self) -> ActionType {
        match self {
            WorkflowAction::Resolve => ActionType::Resolve,
            WorkflowAction::SendBack { .. } => ActionType::SendBack,
            WorkflowAction::Escalate { .. } => ActionType::Escalate,
        }
    }
}

/// A transition request as handed over by any transport adapter.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub complaint_id: i64,
    pub escalation_id: i64,
    pub action: WorkflowAction,
    /// Free-text reason/decision text; becomes the decision row and, for
    /// resolve, the complaint's resolution.
    pub reason: String,
}

/// The resolved next assignee of a send-back or escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipient {
    pub role: Role,
    pub actor_id: i64,
}

/// Everything a committed transition writes, computed up front.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub action: ActionType,
    pub complaint_id: i64,
    pub new_complaint_status: ComplaintStatus,
    /// Resolution text for the complaint row; set only by resolve.
    pub complaint_resolution: Option<String>,
    /// The pending escalation to mark resolved.
    pub close_escalation_id: i64,
    /// Audit string stored on the closed escalation row.
    pub close_details: String,
    /// The replacement pending escalation (send-back and escalate only).
    pub new_escalation: Option<NewEscalation>,
    pub decision: NewDecision,
    pub notifications: Vec<NotificationDraft>,
    /// Executive report, when the transition crosses into the upper tiers.
    pub report: Option<NewReport>,
    /// Human-readable outcome line for the caller.
    pub message: String,
}

/// Reject malformed requests before any lock is taken.
///
/// Covers reason-text bounds and the escalation allow-list; recipient
/// existence is checked later, inside the transaction, against the actor
/// directory.
pub fn validate_request(
    actor: ActorContext,
    request: &TransitionRequest,
    max_reason_chars: usize,
) -> Result<(), RedressError> {
    if request.reason.trim().is_empty() {
        return Err(RedressError::Validation(
            "reason text must not be empty".to_string(),
        ));
    }
    let len = request.reason.chars().count();
    if len > max_reason_chars {
        return Err(RedressError::Validation(format!(
            "reason text is {len} characters, limit is {max_reason_chars}"
        )));
    }
    if let WorkflowAction::Escalate { target_role, .. } = request.action
        && !actor.role.may_escalate_to(target_role)
    {
        return Err(RedressError::Validation(format!(
            "role {} may not escalate to {target_role}",
            actor.role
        )));
    }
    Ok(())
}

/// Compute the full transition plan. Pure; no side effects.
///
/// `recipient` must already be resolved against the actor directory:
/// `Some` for send-back/escalate, `None` for resolve.
pub fn plan_transition(
    complaint: &Complaint,
    escalation: &Escalation,
    actor: ActorContext,
    action: WorkflowAction,
    reason: &str,
    recipient: Option<Recipient>,
) -> TransitionPlan {
    let action_type = action.action_type();
    let reason = reason.trim();

    let (new_complaint_status, complaint_resolution, close_details, decision_status, message) =
        match (action, recipient) {
            (WorkflowAction::Resolve, _) => (
                ComplaintStatus::Resolved,
                Some(reason.to_string()),
                format!("resolved by {} #{}: {reason}", actor.role, actor.actor_id),
                DecisionStatus::Final,
                format!("complaint #{} resolved", complaint.id),
            ),
            (WorkflowAction::SendBack { .. }, Some(to)) => (
                ComplaintStatus::PendingMoreInfo,
                None,
                format!(
                    "sent back to {} #{} by {} #{}: {reason}",
                    to.role, to.actor_id, actor.role, actor.actor_id
                ),
                DecisionStatus::Pending,
                format!("complaint #{} sent back to {} #{}", complaint.id, to.role, to.actor_id),
            ),
            (WorkflowAction::Escalate { .. }, Some(to)) => (
                if to.role.is_upper_tier() {
                    ComplaintStatus::Escalated
                } else {
                    ComplaintStatus::InProgress
                },
                None,
                format!(
                    "escalated to {} #{} by {} #{}: {reason}",
                    to.role, to.actor_id, actor.role, actor.actor_id
                ),
                DecisionStatus::Escalated,
                format!("complaint #{} escalated to {} #{}", complaint.id, to.role, to.actor_id),
            ),
            // The coordinator resolves a recipient before planning; a
            // send-back/escalate without one cannot reach this point.
            (WorkflowAction::SendBack { .. } | WorkflowAction::Escalate { .. }, None) => {
                unreachable!("send_back/escalate planned without a resolved recipient")
            }
        };

    let new_escalation = recipient.map(|to| NewEscalation {
        complaint_id: complaint.id,
        escalated_to: to.role,
        escalated_to_id: to.actor_id,
        escalated_by_id: actor.actor_id,
        original_handler_id: escalation.original_handler_id,
        action_type,
    });

    let decision = NewDecision {
        complaint_id: complaint.id,
        escalation_id: Some(escalation.id),
        sender_id: actor.actor_id,
        receiver_id: recipient.map(|to| to.actor_id),
        decision_text: reason.to_string(),
        status: decision_status,
    };

    let notifications =
        dispatch::compute_recipients(action_type, complaint, escalation, actor, recipient, reason);

    let report = plan_report(complaint, escalation, actor, action_type, recipient, reason);

    TransitionPlan {
        action: action_type,
        complaint_id: complaint.id,
        new_complaint_status,
        complaint_resolution,
        close_escalation_id: escalation.id,
        close_details,
        new_escalation,
        decision,
        notifications,
        report,
        message,
    }
}

/// An executive report is filed when a transition involves an upper-tier
/// participant: the acting role, or the role the complaint lands on.
fn plan_report(
    complaint: &Complaint,
    escalation: &Escalation,
    actor: ActorContext,
    action: ActionType,
    recipient: Option<Recipient>,
    reason: &str,
) -> Option<NewReport> {
    let recipient_upper = recipient.is_some_and(|to| to.role.is_upper_tier());
    if !actor.role.is_upper_tier() && !recipient_upper {
        return None;
    }

    let report_recipient = match recipient {
        Some(to) if to.role.is_upper_tier() => to.actor_id,
        _ => actor.actor_id,
    };
    let report_type = match action {
        ActionType::Resolve => "resolution_report",
        ActionType::SendBack => "send_back_report",
        ActionType::Escalate => "escalation_report",
        ActionType::Assign => return None,
    };

    Some(NewReport {
        complaint_id: complaint.id,
        handler_id: complaint.handler_id.or(escalation.original_handler_id),
        recipient_id: report_recipient,
        report_type: report_type.to_string(),
        report_content: format!(
            "complaint #{} \"{}\": {action} by {} #{}: {reason}",
            complaint.id, complaint.title, actor.role, actor.actor_id
        ),
    })
}

#[cfg(test)]
mod tests {
    use redress_core::types::EscalationStatus;

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

    fn pending_escalation() -> Escalation {
        Escalation {
            id: 5,
            complaint_id: 42,
            escalated_to: Role::Sims,
            escalated_to_id: 7,
            escalated_by_id: 2,
            original_handler_id: Some(2),
            status: EscalationStatus::Pending,
            action_type: Some(ActionType::Escalate),
            resolution_details: None,
            created_at: "2026-01-02T00:00:00.000Z".to_string(),
            resolved_at: None,
        }
    }

    fn sims_actor() -> ActorContext {
        ActorContext {
            actor_id: 7,
            role: Role::Sims,
        }
    }

    #[test]
    fn empty_reason_is_rejected() {
        let request = TransitionRequest {
            complaint_id: 42,
            escalation_id: 5,
            action: WorkflowAction::Resolve,
            reason: "   ".to_string(),
        };
        let err = validate_request(sims_actor(), &request, 2000).unwrap_err();
        assert!(matches!(err, RedressError::Validation(_)));
    }

    #[test]
    fn oversized_reason_is_rejected() {
        let request = TransitionRequest {
            complaint_id: 42,
            escalation_id: 5,
            action: WorkflowAction::Resolve,
            reason: "x".repeat(51),
        };
        assert!(validate_request(sims_actor(), &request, 50).is_err());
        let request = TransitionRequest {
            reason: "x".repeat(50),
            ..request
        };
        assert!(validate_request(sims_actor(), &request, 50).is_ok());
    }

    #[test]
    fn off_ladder_escalation_target_is_rejected() {
        let request = TransitionRequest {
            complaint_id: 42,
            escalation_id: 5,
            action: WorkflowAction::Escalate {
                target_role: Role::AcademicVp,
                target_actor_id: 9,
            },
            reason: "needs vp".to_string(),
        };
        let err = validate_request(sims_actor(), &request, 2000).unwrap_err();
        assert!(matches!(err, RedressError::Validation(_)));
    }

    #[test]
    fn resolve_plan_closes_everything() {
        let plan = plan_transition(
            &complaint(),
            &pending_escalation(),
            sims_actor(),
            WorkflowAction::Resolve,
            "issue fixed",
            None,
        );
        assert_eq!(plan.new_complaint_status, ComplaintStatus::Resolved);
        assert_eq!(plan.complaint_resolution.as_deref(), Some("issue fixed"));
        assert_eq!(plan.close_escalation_id, 5);
        assert!(plan.close_details.contains("resolved by sims #7"));
        assert!(plan.new_escalation.is_none());
        assert_eq!(plan.decision.receiver_id, None);
        assert_eq!(plan.decision.status, DecisionStatus::Final);
        assert!(plan.report.is_none());
    }

    #[test]
    fn escalate_plan_carries_original_handler_forward() {
        let recipient = Recipient {
            role: Role::CampusRegistrar,
            actor_id: 3,
        };
        let plan = plan_transition(
            &complaint(),
            &pending_escalation(),
            sims_actor(),
            WorkflowAction::Escalate {
                target_role: Role::CampusRegistrar,
                target_actor_id: 3,
            },
            "needs registrar",
            Some(recipient),
        );
        assert_eq!(plan.new_complaint_status, ComplaintStatus::InProgress);
        let new_escalation = plan.new_escalation.unwrap();
        assert_eq!(new_escalation.escalated_to, Role::CampusRegistrar);
        assert_eq!(new_escalation.escalated_to_id, 3);
        assert_eq!(new_escalation.escalated_by_id, 7);
        assert_eq!(new_escalation.original_handler_id, Some(2));
        assert_eq!(plan.decision.receiver_id, Some(3));
        assert_eq!(plan.decision.status, DecisionStatus::Escalated);
        assert!(plan.report.is_none(), "campus registrar is not upper tier");
    }

    #[test]
    fn escalate_to_upper_tier_marks_escalated_and_files_report() {
        let actor = ActorContext {
            actor_id: 4,
            role: Role::UniversityRegistrar,
        };
        let recipient = Recipient {
            role: Role::AcademicVp,
            actor_id: 5,
        };
        let plan = plan_transition(
            &complaint(),
            &pending_escalation(),
            actor,
            WorkflowAction::Escalate {
                target_role: Role::AcademicVp,
                target_actor_id: 5,
            },
            "board question",
            Some(recipient),
        );
        assert_eq!(plan.new_complaint_status, ComplaintStatus::Escalated);
        let report = plan.report.unwrap();
        assert_eq!(report.recipient_id, 5);
        assert_eq!(report.report_type, "escalation_report");
        assert_eq!(report.handler_id, Some(2));
    }

    #[test]
    fn send_back_plan_uses_pending_more_info_uniformly() {
        let recipient = Recipient {
            role: Role::Handler,
            actor_id: 2,
        };
        let plan = plan_transition(
            &complaint(),
            &pending_escalation(),
            sims_actor(),
            WorkflowAction::SendBack {
                target: Some(SendBackTarget::OriginalHandler),
            },
            "need the room number",
            Some(recipient),
        );
        assert_eq!(plan.new_complaint_status, ComplaintStatus::PendingMoreInfo);
        assert!(plan.complaint_resolution.is_none());
        let new_escalation = plan.new_escalation.unwrap();
        assert_eq!(new_escalation.escalated_to_id, 2);
        assert_eq!(new_escalation.action_type, ActionType::SendBack);
        assert_eq!(plan.decision.status, DecisionStatus::Pending);
    }
}
