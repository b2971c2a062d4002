// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Redress workflow engine.
//!
//! Routes a complaint through the organizational ladder until it is
//! resolved, tracking every hand-off, decision, and notification:
//!
//! - [`gate`]: may this actor act on this complaint/escalation pair?
//! - [`machine`]: the pure transition logic producing a declarative
//!   [`machine::TransitionPlan`].
//! - [`dispatch`]: the deduplicated notification recipient set for a plan.
//! - [`engine`]: the transaction coordinator executing a plan as one
//!   atomic unit, plus the read surface.
//! - [`report`]: the best-effort executive-report side channel.

pub mod dispatch;
pub mod engine;
pub mod gate;
pub mod machine;
pub mod report;

pub use engine::{ComplaintDetail, TransitionOutcome, WorkflowEngine};
pub use machine::{TransitionRequest, WorkflowAction};
pub use report::{ReportSink, SqliteReportSink};
