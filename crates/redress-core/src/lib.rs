// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Redress complaint workflow engine.
//!
//! This crate provides the error type, the closed role vocabulary with its
//! escalation routing table, and the ledger entity types (complaints,
//! escalations, decisions, notifications) shared by the storage layer and
//! the workflow engine.

pub mod error;
pub mod roles;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RedressError;
pub use roles::Role;
pub use types::{
    ActionType, ActorAccount, ActorContext, Complaint, ComplaintStatus, Decision, DecisionStatus,
    Escalation, EscalationStatus, Notification, SendBackTarget, StereotypedReport,
};
