// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redress - a complaint escalation workflow engine.
//!
//! This is the command-line entry point: it loads configuration, opens the
//! ledger, and hands each subcommand to the workflow engine.

mod commands;

use clap::{Args, Parser, Subcommand};
use redress_core::roles::Role;
use redress_core::types::SendBackTarget;
use redress_storage::Database;
use redress_workflow::WorkflowEngine;

/// Redress - a complaint escalation workflow engine.
#[derive(Parser, Debug)]
#[command(name = "redress", version, about, long_about = None)]
struct Cli {
    /// Emit machine-readable JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// The acting (actor, role) pair a gated command runs as.
#[derive(Args, Debug, Clone, Copy)]
struct ActorArgs {
    /// Acting actor's account id.
    #[arg(long)]
    actor: i64,
    /// Role the actor is acting in.
    #[arg(long)]
    role: Role,
}

/// The (complaint, escalation) pair a transition targets.
#[derive(Args, Debug, Clone, Copy)]
struct TargetArgs {
    /// Complaint id.
    #[arg(long)]
    complaint: i64,
    /// Pending escalation id on that complaint.
    #[arg(long)]
    escalation: i64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register an actor account in the directory.
    AddActor {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: Role,
    },
    /// Record a new complaint.
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Option<String>,
        /// Submitting user's id.
        #[arg(long)]
        submitted_by: i64,
    },
    /// Hand a fresh complaint to a front-line handler.
    Assign {
        #[arg(long)]
        complaint: i64,
        /// Handler account id.
        #[arg(long)]
        handler: i64,
        /// Id of whoever performs the assignment.
        #[arg(long)]
        by: i64,
    },
    /// Resolve a pending complaint assigned to you.
    Resolve {
        #[command(flatten)]
        actor: ActorArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// Resolution text; recorded on the complaint and the decision.
        #[arg(long)]
        reason: String,
    },
    /// Return a pending complaint to a prior participant.
    SendBack {
        #[command(flatten)]
        actor: ActorArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// Who to return it to; defaults to the escalator, then the
        /// original handler.
        #[arg(long)]
        to: Option<SendBackTarget>,
        #[arg(long)]
        reason: String,
    },
    /// Escalate a pending complaint up the ladder.
    Escalate {
        #[command(flatten)]
        actor: ActorArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// Role to escalate to; must be on the acting role's allow-list.
        #[arg(long)]
        to_role: Role,
        /// Account id of the role-holder receiving the complaint.
        #[arg(long)]
        to_actor: i64,
        #[arg(long)]
        reason: String,
    },
    /// List pending assignments for an actor.
    Inbox {
        #[command(flatten)]
        actor: ActorArgs,
    },
    /// Show a complaint with its full escalation and decision history.
    Show {
        #[arg(long)]
        complaint: i64,
    },
    /// List notifications for a user.
    Notifications {
        #[arg(long)]
        user: i64,
        /// Only unread notifications.
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification (or all of a user's) read.
    MarkRead {
        #[arg(long)]
        user: i64,
        /// Notification id; omit together with --all to mark everything.
        #[arg(long, conflicts_with = "all")]
        id: Option<i64>,
        /// Mark all of the user's notifications read.
        #[arg(long)]
        all: bool,
    },
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("redress={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match redress_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            redress_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.service.log_level);

    let db = match Database::open(&config.storage.database_path).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("redress: cannot open ledger: {e}");
            std::process::exit(1);
        }
    };
    let engine = WorkflowEngine::new(db, &config.workflow);

    if let Err(e) = commands::run(&engine, cli).await {
        // Storage detail goes to the log; callers get a generic message.
        if let redress_core::RedressError::Storage { source } = &e {
            tracing::error!(error = %source, "storage failure");
            eprintln!("redress: storage error; try again");
        } else {
            eprintln!("redress: {e}");
        }
        std::process::exit(1);
    }
}
