//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod aggregate;
pub mod apply;
pub mod audit;
pub mod diff;

pub use aggregate::handle_aggregate;
pub use apply::handle_apply;
pub use audit::handle_audit;
pub use diff::handle_diff;
