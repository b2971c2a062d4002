// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand handlers: translate CLI arguments into engine calls and
//! render the results as plain text or JSON.

use redress_core::types::ActorContext;
use redress_core::RedressError;
use redress_workflow::{
    TransitionOutcome, TransitionRequest, WorkflowAction, WorkflowEngine,
};
use serde_json::json;

use crate::{ActorArgs, Cli, Commands, TargetArgs};

impl ActorArgs {
    fn context(self) -> ActorContext {
        ActorContext {
            actor_id: self.actor,
            role: self.role,
        }
    }
}

fn print_outcome(json_output: bool, outcome: &TransitionOutcome) {
    if json_output {
        println!(
            "{}",
            json!({
                "complaint_id": outcome.complaint_id,
                "message": outcome.message,
                "warning": outcome.warning,
            })
        );
    } else {
        println!("{}", outcome.message);
        if let Some(warning) = &outcome.warning {
            eprintln!("warning: {warning}");
        }
    }
}

async fn transition(
    engine: &WorkflowEngine,
    json_output: bool,
    actor: ActorArgs,
    target: TargetArgs,
    action: WorkflowAction,
    reason: String,
) -> Result<(), RedressError> {
    let outcome = engine
        .perform_transition(
            actor.context(),
            TransitionRequest {
                complaint_id: target.complaint,
                escalation_id: target.escalation,
                action,
                reason,
            },
        )
        .await?;
    print_outcome(json_output, &outcome);
    Ok(())
}

pub async fn run(engine: &WorkflowEngine, cli: Cli) -> Result<(), RedressError> {
    let json_output = cli.json;
    match cli.command {
        Commands::AddActor { name, role } => {
            let id = engine.create_actor(&name, role).await?;
            if json_output {
                println!("{}", json!({ "actor_id": id, "role": role }));
            } else {
                println!("actor #{id} registered as {role}");
            }
        }
        Commands::Submit {
            title,
            description,
            category,
            submitted_by,
        } => {
            let id = engine
                .submit_complaint(&title, &description, category.as_deref(), submitted_by)
                .await?;
            if json_output {
                println!("{}", json!({ "complaint_id": id }));
            } else {
                println!("complaint #{id} recorded");
            }
        }
        Commands::Assign {
            complaint,
            handler,
            by,
        } => {
            let escalation_id = engine.assign_to_handler(complaint, handler, by).await?;
            if json_output {
                println!(
                    "{}",
                    json!({ "complaint_id": complaint, "escalation_id": escalation_id })
                );
            } else {
                println!("complaint #{complaint} assigned to handler #{handler}");
            }
        }
        Commands::Resolve {
            actor,
            target,
            reason,
        } => {
            transition(
                engine,
                json_output,
                actor,
                target,
                WorkflowAction::Resolve,
                reason,
            )
            .await?;
        }
        Commands::SendBack {
            actor,
            target,
            to,
            reason,
        } => {
            transition(
                engine,
                json_output,
                actor,
                target,
                WorkflowAction::SendBack { target: to },
                reason,
            )
            .await?;
        }
        Commands::Escalate {
            actor,
            target,
            to_role,
            to_actor,
            reason,
        } => {
            transition(
                engine,
                json_output,
                actor,
                target,
                WorkflowAction::Escalate {
                    target_role: to_role,
                    target_actor_id: to_actor,
                },
                reason,
            )
            .await?;
        }
        Commands::Inbox { actor } => {
            let inbox = engine.list_pending_for(actor.context()).await?;
            if json_output {
                let entries: Vec<_> = inbox
                    .iter()
                    .map(|entry| {
                        json!({ "complaint": entry.complaint, "escalation": entry.escalation })
                    })
                    .collect();
                println!("{}", json!(entries));
            } else if inbox.is_empty() {
                println!("inbox empty");
            } else {
                for entry in &inbox {
                    println!(
                        "#{} [{}] {} (escalation #{}, from #{})",
                        entry.complaint.id,
                        entry.complaint.status,
                        entry.complaint.title,
                        entry.escalation.id,
                        entry.escalation.escalated_by_id,
                    );
                }
            }
        }
        Commands::Show { complaint } => {
            let Some(detail) = engine.get_complaint_detail(complaint).await? else {
                return Err(RedressError::NotPermitted);
            };
            if json_output {
                println!(
                    "{}",
                    json!({
                        "complaint": detail.complaint,
                        "escalations": detail.escalations,
                        "decisions": detail.decisions,
                    })
                );
            } else {
                let c = &detail.complaint;
                println!("complaint #{} [{}] {}", c.id, c.status, c.title);
                println!("  submitted by #{} at {}", c.submitted_by, c.created_at);
                if let Some(resolution) = &c.resolution {
                    println!("  resolution: {resolution}");
                }
                for e in &detail.escalations {
                    let kind = e
                        .action_type
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "hand-off".to_string());
                    println!(
                        "  {} -> {} #{} [{}] by #{} at {}",
                        kind, e.escalated_to, e.escalated_to_id, e.status, e.escalated_by_id,
                        e.created_at,
                    );
                }
                for d in &detail.decisions {
                    println!(
                        "  decision [{}] by #{} at {}: {}",
                        d.status, d.sender_id, d.created_at, d.decision_text,
                    );
                }
            }
        }
        Commands::Notifications { user, unread } => {
            let notices = engine.list_notifications(user, unread).await?;
            if json_output {
                println!("{}", json!(notices));
            } else if notices.is_empty() {
                println!("no notifications");
            } else {
                for n in &notices {
                    let marker = if n.is_read { " " } else { "*" };
                    println!(
                        "{marker} #{} complaint #{}: {} ({})",
                        n.id, n.complaint_id, n.description, n.created_at,
                    );
                }
            }
        }
        Commands::MarkRead { user, id, all } => match (id, all) {
            (Some(id), _) => {
                engine.mark_notification_read(user, id).await?;
                if json_output {
                    println!("{}", json!({ "marked_read": 1 }));
                } else {
                    println!("notification #{id} marked read");
                }
            }
            (None, true) => {
                let cleared = engine.mark_all_notifications_read(user).await?;
                if json_output {
                    println!("{}", json!({ "marked_read": cleared }));
                } else {
                    println!("{cleared} notifications marked read");
                }
            }
            (None, false) => {
                return Err(RedressError::Validation(
                    "pass --id <id> or --all".to_string(),
                ));
            }
        },
    }
    Ok(())
}
