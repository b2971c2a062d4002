// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The transaction coordinator.
//!
//! [`WorkflowEngine::perform_transition`] executes one workflow transition
//! as a single SQLite transaction: gate re-check, recipient resolution
//! against the actor directory, plan computation, and every ledger write,
//! committed together or not at all. Domain denials (gate failure, missing
//! recipient) surface as values from inside the transaction closure so the
//! transaction rolls back by drop rather than by error plumbing.
//!
//! Executive reports are the one deliberate exception to atomicity: they go
//! through the [`ReportSink`] after commit, and a sink failure downgrades to
//! a warning on the outcome.

use std::sync::Arc;

use redress_config::model::WorkflowConfig;
use redress_core::roles::Role;
use redress_core::types::{
    ActionType, ActorContext, Complaint, ComplaintStatus, Decision, Escalation, Notification,
    SendBackTarget,
};
use redress_core::RedressError;
use redress_storage::database::map_tr_err;
use redress_storage::queries::{actors, complaints, decisions, escalations, notifications};
use redress_storage::{Database, NewEscalation, NewReport, PendingAssignment};

use crate::machine::{self, Recipient, TransitionRequest, WorkflowAction};
use crate::report::{ReportSink, SqliteReportSink};
use crate::gate;

/// The result of a committed transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub complaint_id: i64,
    /// Human-readable outcome line.
    pub message: String,
    /// Set when the transition committed but the executive report could not
    /// be delivered.
    pub warning: Option<String>,
}

/// A complaint with its full escalation and decision history.
#[derive(Debug, Clone)]
pub struct ComplaintDetail {
    pub complaint: Complaint,
    pub escalations: Vec<Escalation>,
    pub decisions: Vec<Decision>,
}

/// A domain rejection decided inside the transaction. Returning it as a
/// value (instead of an error) lets the closure drop the transaction,
/// rolling back any staged writes.
enum Denial {
    NotPermitted,
    NoRecipient(String),
    Invalid(String),
}

impl Denial {
    fn into_error(self) -> RedressError {
        match self {
            Denial::NotPermitted => RedressError::NotPermitted,
            Denial::NoRecipient(msg) => RedressError::NoRecipientAvailable(msg),
            Denial::Invalid(msg) => RedressError::Validation(msg),
        }
    }
}

/// What a committed transition hands back across the connection boundary.
struct Staged {
    complaint_id: i64,
    message: String,
    report: Option<NewReport>,
}

/// The workflow coordinator: owns the ledger handle and the report sink.
pub struct WorkflowEngine {
    db: Database,
    report_sink: Option<Arc<dyn ReportSink>>,
    max_reason_chars: usize,
}

impl WorkflowEngine {
    /// Build an engine over an open ledger. When `executive_reports` is on,
    /// the bundled ledger-table sink is installed.
    pub fn new(db: Database, workflow: &WorkflowConfig) -> Self {
        let report_sink = workflow
            .executive_reports
            .then(|| Arc::new(SqliteReportSink::new(db.clone())) as Arc<dyn ReportSink>);
        Self {
            db,
            report_sink,
            max_reason_chars: workflow.max_reason_chars,
        }
    }

    /// Replace the report sink (or install one the config left off).
    pub fn with_report_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.report_sink = Some(sink);
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint and close the underlying ledger.
    pub async fn close(self) -> Result<(), RedressError> {
        self.db.close().await
    }

    /// Execute one workflow transition atomically.
    ///
    /// Request-shape validation happens before any lock is taken; the gate,
    /// recipient resolution, and all writes run inside one transaction. The
    /// executive report (if the plan carries one) is submitted after commit
    /// and reported as a soft warning on failure.
    pub async fn perform_transition(
        &self,
        actor: ActorContext,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, RedressError> {
        machine::validate_request(actor, &request, self.max_reason_chars)?;

        let staged = self
            .db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                match stage(&tx, actor, &request)? {
                    Ok(staged) => {
                        tx.commit()?;
                        Ok(Ok(staged))
                    }
                    // Dropping `tx` rolls back whatever was staged.
                    Err(denial) => Ok(Err(denial)),
                }
            })
            .await
            .map_err(map_tr_err)?
            .map_err(Denial::into_error)?;

        tracing::info!(
            complaint_id = staged.complaint_id,
            actor_id = actor.actor_id,
            role = %actor.role,
            "transition committed: {}",
            staged.message
        );

        let mut warning = None;
        if let Some(report) = staged.report
            && let Some(sink) = &self.report_sink
            && let Err(e) = sink.submit(report).await
        {
            tracing::warn!(
                complaint_id = staged.complaint_id,
                error = %e,
                "executive report delivery failed after commit"
            );
            warning = Some(format!("executive report could not be delivered: {e}"));
        }

        Ok(TransitionOutcome {
            complaint_id: staged.complaint_id,
            message: staged.message,
            warning,
        })
    }

    /// The actor's inbox: pending escalations assigned to them in their
    /// current role, oldest first.
    pub async fn list_pending_for(
        &self,
        actor: ActorContext,
    ) -> Result<Vec<PendingAssignment>, RedressError> {
        escalations::list_pending_assigned(&self.db, actor.role, actor.actor_id).await
    }

    /// A complaint with its complete escalation and decision history.
    pub async fn get_complaint_detail(
        &self,
        complaint_id: i64,
    ) -> Result<Option<ComplaintDetail>, RedressError> {
        let Some(complaint) = complaints::get_complaint(&self.db, complaint_id).await? else {
            return Ok(None);
        };
        let escalations = escalations::list_for_complaint(&self.db, complaint_id).await?;
        let decisions = decisions::list_for_complaint(&self.db, complaint_id).await?;
        Ok(Some(ComplaintDetail {
            complaint,
            escalations,
            decisions,
        }))
    }

    /// A user's notifications, newest first.
    pub async fn list_notifications(
        &self,
        user_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, RedressError> {
        notifications::list_for_user(&self.db, user_id, unread_only).await
    }

    /// Mark one of the user's notifications read. A notification that does
    /// not exist or belongs to someone else answers the same way.
    pub async fn mark_notification_read(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<(), RedressError> {
        let changed = notifications::mark_read(&self.db, user_id, notification_id).await?;
        if changed == 0 {
            return Err(RedressError::NotPermitted);
        }
        Ok(())
    }

    /// Mark all of the user's notifications read. Returns how many were.
    pub async fn mark_all_notifications_read(&self, user_id: i64) -> Result<usize, RedressError> {
        notifications::mark_all_read(&self.db, user_id).await
    }

    /// Register an actor account in the directory.
    pub async fn create_actor(
        &self,
        display_name: &str,
        role: Role,
    ) -> Result<i64, RedressError> {
        if display_name.trim().is_empty() {
            return Err(RedressError::Validation(
                "display name must not be empty".to_string(),
            ));
        }
        actors::create_actor(&self.db, display_name.trim(), role).await
    }

    /// Intake: record a new complaint. Returns the complaint id.
    pub async fn submit_complaint(
        &self,
        title: &str,
        description: &str,
        category: Option<&str>,
        submitted_by: i64,
    ) -> Result<i64, RedressError> {
        if title.trim().is_empty() {
            return Err(RedressError::Validation(
                "complaint title must not be empty".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(RedressError::Validation(
                "complaint description must not be empty".to_string(),
            ));
        }
        let id =
            complaints::create_complaint(&self.db, title.trim(), description, category, submitted_by)
                .await?;
        tracing::info!(complaint_id = id, submitted_by, "complaint submitted");
        Ok(id)
    }

    /// Intake: hand a fresh complaint to a front-line handler. Atomically
    /// sets the complaint's handler, opens the first pending escalation, and
    /// notifies the handler. Returns the escalation id.
    pub async fn assign_to_handler(
        &self,
        complaint_id: i64,
        handler_id: i64,
        assigned_by: i64,
    ) -> Result<i64, RedressError> {
        let staged = self
            .db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                match stage_assignment(&tx, complaint_id, handler_id, assigned_by)? {
                    Ok(escalation_id) => {
                        tx.commit()?;
                        Ok(Ok(escalation_id))
                    }
                    Err(denial) => Ok(Err(denial)),
                }
            })
            .await
            .map_err(map_tr_err)?;
        let escalation_id = staged.map_err(Denial::into_error)?;
        tracing::info!(complaint_id, handler_id, escalation_id, "complaint assigned");
        Ok(escalation_id)
    }
}

/// Stage every write of one transition inside an open transaction. Domain
/// rejections come back as `Ok(Err(_))` so the caller can roll back.
fn stage(
    conn: &rusqlite::Connection,
    actor: ActorContext,
    request: &TransitionRequest,
) -> rusqlite::Result<Result<Staged, Denial>> {
    // Gate and TOCTOU re-check in one fetch: the losing side of a race
    // finds the escalation already resolved and gets no row.
    let Some(escalation) = gate::check_tx(conn, actor, request.complaint_id, request.escalation_id)?
    else {
        return Ok(Err(Denial::NotPermitted));
    };
    let Some(complaint) = complaints::get_complaint_tx(conn, request.complaint_id)? else {
        return Ok(Err(Denial::NotPermitted));
    };

    let recipient = match resolve_recipient(conn, &escalation, request.action)? {
        Ok(recipient) => recipient,
        Err(denial) => return Ok(Err(denial)),
    };

    let plan = machine::plan_transition(
        &complaint,
        &escalation,
        actor,
        request.action,
        &request.reason,
        recipient,
    );

    // Close the old pending row before inserting its replacement; the
    // one-pending-per-complaint index is checked on insert.
    match &plan.complaint_resolution {
        Some(resolution) => {
            complaints::resolve_tx(conn, plan.complaint_id, resolution)?;
        }
        None => {
            complaints::set_status_tx(conn, plan.complaint_id, plan.new_complaint_status)?;
        }
    }
    escalations::resolve_escalation_tx(conn, plan.close_escalation_id, &plan.close_details)?;
    if let Some(new_escalation) = &plan.new_escalation {
        escalations::insert_escalation_tx(conn, new_escalation)?;
    }
    decisions::insert_decision_tx(conn, &plan.decision)?;
    for draft in &plan.notifications {
        notifications::insert_notification_tx(
            conn,
            draft.recipient_id,
            plan.complaint_id,
            &draft.message,
        )?;
    }

    Ok(Ok(Staged {
        complaint_id: plan.complaint_id,
        message: plan.message,
        report: plan.report,
    }))
}

/// Resolve the action's next assignee against the actor directory.
///
/// Escalate requires the named actor to exist, be active, and hold the
/// requested role right now. Send-back with no explicit target tries the
/// immediate escalator first, then the original front-line handler.
fn resolve_recipient(
    conn: &rusqlite::Connection,
    escalation: &Escalation,
    action: WorkflowAction,
) -> rusqlite::Result<Result<Option<Recipient>, Denial>> {
    match action {
        WorkflowAction::Resolve => Ok(Ok(None)),
        WorkflowAction::Escalate {
            target_role,
            target_actor_id,
        } => {
            match actors::get_actor_tx(conn, target_actor_id)? {
                Some(account) if account.is_active && account.role == target_role => {
                    Ok(Ok(Some(Recipient {
                        role: target_role,
                        actor_id: target_actor_id,
                    })))
                }
                _ => Ok(Err(Denial::NoRecipient(format!(
                    "no active {target_role} account #{target_actor_id}"
                )))),
            }
        }
        WorkflowAction::SendBack { target } => {
            let escalator = send_back_escalator(conn, escalation)?;
            let original = send_back_original_handler(conn, escalation)?;
            let resolved = match target {
                Some(SendBackTarget::Escalator) => escalator,
                Some(SendBackTarget::OriginalHandler) => original,
                None => escalator.or(original),
            };
            match resolved {
                Some(recipient) => Ok(Ok(Some(recipient))),
                None => Ok(Err(Denial::NoRecipient(
                    "no eligible send-back recipient for this complaint".to_string(),
                ))),
            }
        }
    }
}

/// The immediate escalator as a send-back recipient, if their account is
/// still active.
fn send_back_escalator(
    conn: &rusqlite::Connection,
    escalation: &Escalation,
) -> rusqlite::Result<Option<Recipient>> {
    match actors::get_actor_tx(conn, escalation.escalated_by_id)? {
        Some(account) if account.is_active => Ok(Some(Recipient {
            role: account.role,
            actor_id: account.id,
        })),
        _ => Ok(None),
    }
}

/// The original front-line handler as a send-back recipient, if they still
/// hold the handler role on an active account.
fn send_back_original_handler(
    conn: &rusqlite::Connection,
    escalation: &Escalation,
) -> rusqlite::Result<Option<Recipient>> {
    let Some(handler_id) = escalation.original_handler_id else {
        return Ok(None);
    };
    match actors::get_actor_tx(conn, handler_id)? {
        Some(account) if account.is_active && account.role == Role::Handler => {
            Ok(Some(Recipient {
                role: Role::Handler,
                actor_id: account.id,
            }))
        }
        _ => Ok(None),
    }
}

/// Stage the intake assignment: complaint exists, is still open, has no
/// pending escalation, and the handler account is an active handler.
fn stage_assignment(
    conn: &rusqlite::Connection,
    complaint_id: i64,
    handler_id: i64,
    assigned_by: i64,
) -> rusqlite::Result<Result<i64, Denial>> {
    let Some(complaint) = complaints::get_complaint_tx(conn, complaint_id)? else {
        return Ok(Err(Denial::NotPermitted));
    };
    if matches!(
        complaint.status,
        ComplaintStatus::Resolved | ComplaintStatus::Rejected
    ) {
        return Ok(Err(Denial::Invalid(format!(
            "complaint #{complaint_id} is already closed"
        ))));
    }
    if escalations::count_pending_tx(conn, complaint_id)? > 0 {
        return Ok(Err(Denial::Invalid(format!(
            "complaint #{complaint_id} already has a pending assignment"
        ))));
    }
    match actors::get_actor_tx(conn, handler_id)? {
        Some(account) if account.is_active && account.role == Role::Handler => {}
        _ => {
            return Ok(Err(Denial::NoRecipient(format!(
                "no active handler account #{handler_id}"
            ))));
        }
    }

    complaints::set_handler_tx(conn, complaint_id, handler_id)?;
    complaints::set_status_tx(conn, complaint_id, ComplaintStatus::InProgress)?;
    let escalation_id = escalations::insert_escalation_tx(
        conn,
        &NewEscalation {
            complaint_id,
            escalated_to: Role::Handler,
            escalated_to_id: handler_id,
            escalated_by_id: assigned_by,
            original_handler_id: Some(handler_id),
            action_type: ActionType::Assign,
        },
    )?;
    notifications::insert_notification_tx(
        conn,
        handler_id,
        complaint_id,
        &format!(
            "a complaint requires your attention: \"{}\"",
            complaint.title
        ),
    )?;
    Ok(Ok(escalation_id))
}
