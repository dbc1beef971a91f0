//! Storage layer for grantwatch
//!
//! Provides JSON file storage with atomic writes plus loaders for the
//! snapshot, change, and baseline files.

pub mod baseline;
pub mod changes;
pub mod file_io;
pub mod snapshots;

pub use baseline::BaselineStore;
pub use changes::{load_all as load_all_changes, load_month as load_month_changes, ChangeFile};
pub use file_io::{read_json_required, write_json_atomic};
pub use snapshots::{load_month_accounts, load_snapshot};
