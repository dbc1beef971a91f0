//! Service layer for grantwatch
//!
//! The engines behind the subcommands: snapshot diffing, monthly
//! aggregation, baseline reconciliation, and the least-privilege audit.

pub mod aggregate;
pub mod audit;
pub mod diff;
pub mod reconcile;

pub use aggregate::{aggregate_changes, AggregatePayload};
pub use audit::{build_report, AuditReport};
pub use diff::{diff_accounts, DiffPayload};
pub use reconcile::{apply_changes, ApplyOutcome};
