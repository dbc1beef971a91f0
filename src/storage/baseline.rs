//! Baseline persistence
//!
//! The baseline is loaded in full, mutated in memory, and rewritten
//! atomically as a single unit. A missing baseline is a fatal error for
//! reconciliation and auditing; there is no state to fall back to.

use std::path::PathBuf;

use crate::error::{GrantwatchError, GrantwatchResult};
use crate::models::Baseline;

use super::file_io;

/// Load/save access to the persisted baseline file
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    /// Create a store over the given baseline file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Whether the baseline file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the baseline, failing if the file is missing or malformed
    pub fn load(&self) -> GrantwatchResult<Baseline> {
        if !self.path.exists() {
            return Err(GrantwatchError::Storage(format!(
                "Baseline file not found: {} (run the conversion step first)",
                self.path.display()
            )));
        }
        file_io::read_json_required(&self.path)
    }

    /// Persist the baseline atomically
    pub fn save(&self, baseline: &Baseline) -> GrantwatchResult<()> {
        file_io::write_json_atomic(&self.path, baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaselineAccount, BaselineDatabase, BaselineMetadata, Environment, Role};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_baseline() -> Baseline {
        let mut databases = BTreeMap::new();
        databases.insert(
            "auth-cluster".to_string(),
            BaselineDatabase {
                sheet_name: "PROD auth-cluster".to_string(),
                environment: Environment::Prod,
                accounts: vec![BaselineAccount {
                    user: "jade".to_string(),
                    hosts: "%".to_string(),
                    role: Role::Dba,
                    has_grant: true,
                    note: String::new(),
                }],
            },
        );
        Baseline {
            metadata: BaselineMetadata {
                version: "1.0".to_string(),
                generated_at: Utc::now(),
                last_updated: None,
                applied_changes: Vec::new(),
            },
            databases,
        }
    }

    #[test]
    fn test_missing_baseline_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let store = BaselineStore::new(temp_dir.path().join("baseline_accounts.json"));

        assert!(!store.exists());
        let err = store.load().unwrap_err();
        assert!(matches!(err, GrantwatchError::Storage(_)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = BaselineStore::new(temp_dir.path().join("baseline_accounts.json"));

        store.save(&sample_baseline()).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.total_accounts(), 1);
        assert_eq!(
            loaded.databases.get("auth-cluster").unwrap().accounts[0].user,
            "jade"
        );
    }
}
