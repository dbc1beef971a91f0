//! grantwatch - database account baseline tracking and least-privilege auditing
//!
//! This library implements a monthly operations/compliance workflow over
//! database user accounts: point-in-time snapshots are diffed into typed
//! change actions, change actions are reconciled into a persisted baseline
//! of known accounts and roles, and the baseline is evaluated against
//! least-privilege audit rules.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and the tracked-database catalog
//! - `error`: Custom error types
//! - `models`: Core data models (months, grants, roles, actions, baseline)
//! - `storage`: JSON file storage layer with atomic writes
//! - `services`: Diff, aggregation, reconciliation, and audit engines
//! - `cli`: Command handlers bridging clap to the service layer
//!
//! The baseline file is the sole durable state: it is loaded in full,
//! mutated in memory, and rewritten atomically.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{GrantwatchError, GrantwatchResult};
