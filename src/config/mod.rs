//! Configuration and path management

pub mod catalog;
pub mod paths;

pub use catalog::{Catalog, DatabaseKind};
pub use paths::GrantwatchPaths;
