//! Core data models

pub mod action;
pub mod baseline;
pub mod grants;
pub mod month;
pub mod role;
pub mod snapshot;

pub use action::{ChangeAction, DatabaseChanges};
pub use baseline::{Baseline, BaselineAccount, BaselineDatabase, BaselineMetadata, Environment};
pub use grants::{summarize_grants, GrantSet};
pub use month::Month;
pub use role::{derive_role, Role};
pub use snapshot::{AccountKey, AccountMaps, CanonicalAccount, Snapshot, DEFAULT_SCOPE};
