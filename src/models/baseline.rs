//! Persisted account baseline
//!
//! The baseline is the single authoritative record of known database
//! accounts and their roles. It is created once by an external conversion
//! step, mutated monthly by the reconciler, and persisted as one JSON file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::role::Role;

/// Deployment environment tag on a baseline database
///
/// Audit rules only evaluate PROD databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    #[default]
    Prod,
    Dev,
}

/// Baseline file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineMetadata {
    /// Schema version of the baseline file
    pub version: String,

    /// When the baseline was originally generated
    pub generated_at: DateTime<Utc>,

    /// When the reconciler last touched the baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Change-file identifiers applied during the last reconciliation run
    #[serde(default)]
    pub applied_changes: Vec<String>,
}

/// One known account within a baseline database
///
/// Unique per (database, user); mutated in place by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineAccount {
    pub user: String,

    /// Host pattern(s) the account may connect from
    pub hosts: String,

    /// Coarse role classification used by the audit rules
    #[serde(rename = "type", default)]
    pub role: Role,

    /// Whether the account holds the grant option
    #[serde(rename = "hasGrant", default)]
    pub has_grant: bool,

    /// Free-text audit trail, refreshed by the reconciler
    #[serde(rename = "etc", default)]
    pub note: String,
}

/// One tracked database within the baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineDatabase {
    /// Display name carried over from the conversion source
    #[serde(rename = "sheetName")]
    pub sheet_name: String,

    #[serde(default)]
    pub environment: Environment,

    pub accounts: Vec<BaselineAccount>,
}

impl BaselineDatabase {
    /// Find an account by user name
    pub fn account(&self, user: &str) -> Option<&BaselineAccount> {
        self.accounts.iter().find(|a| a.user == user)
    }

    /// Find an account by user name, mutably
    pub fn account_mut(&mut self, user: &str) -> Option<&mut BaselineAccount> {
        self.accounts.iter_mut().find(|a| a.user == user)
    }

    /// Remove an account by user name, returning it if present
    pub fn remove_account(&mut self, user: &str) -> Option<BaselineAccount> {
        let idx = self.accounts.iter().position(|a| a.user == user)?;
        Some(self.accounts.remove(idx))
    }

    /// Accounts holding the given role
    pub fn accounts_with_role(&self, role: Role) -> Vec<&BaselineAccount> {
        self.accounts.iter().filter(|a| a.role == role).collect()
    }
}

/// The whole persisted baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub metadata: BaselineMetadata,

    /// Baseline key -> database; a BTreeMap keeps serialization stable
    pub databases: BTreeMap<String, BaselineDatabase>,
}

impl Baseline {
    /// Total account count across all databases
    pub fn total_accounts(&self) -> usize {
        self.databases.values().map(|d| d.accounts.len()).sum()
    }

    /// Number of databases with the given environment tag
    pub fn count_environment(&self, env: Environment) -> usize {
        self.databases
            .values()
            .filter(|d| d.environment == env)
            .count()
    }
}
