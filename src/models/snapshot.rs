//! Point-in-time account snapshots
//!
//! A snapshot file holds the raw account listing pulled from one database
//! engine family for one month. Extraction normalizes the raw rows into
//! canonical account maps keyed by composite account identity, which is
//! what the diff engine operates on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grants::GrantSet;
use crate::config::DatabaseKind;

/// Scope token used when a snapshot row carries neither host nor db
pub const DEFAULT_SCOPE: &str = "default";

/// Composite identity of an account within one database
///
/// An explicit (user, scope) pair rather than a concatenated string, so
/// user names containing separator characters cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountKey {
    pub user: String,
    /// Host pattern (MySQL) or authentication database (DocumentDB/Atlas)
    pub scope: String,
}

/// A normalized account extracted from a snapshot; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalAccount {
    pub user: String,
    pub scope: String,
    pub grants: GrantSet,
    pub grant_option: bool,
}

impl CanonicalAccount {
    /// The identity key of this account
    pub fn key(&self) -> AccountKey {
        AccountKey {
            user: self.user.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// Canonical account maps for many databases, keyed by display label
pub type AccountMaps = BTreeMap<String, BTreeMap<AccountKey, CanonicalAccount>>;

/// Raw snapshot file: `{ databases: { <name>: { users: [...] } } }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub databases: BTreeMap<String, SnapshotDatabase>,
}

/// Raw per-database section of a snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDatabase {
    #[serde(default)]
    pub users: Vec<SnapshotUser>,
}

/// One raw account row as written by the snapshot collectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotUser {
    pub user: String,

    /// Host pattern (MySQL collectors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Authentication database (document store collectors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,

    /// Grant statement string (MySQL collectors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grants: Option<GrantSet>,

    /// Role list (document store collectors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<GrantSet>,

    #[serde(default)]
    pub grant_option: bool,
}

impl Snapshot {
    /// Normalize this snapshot into canonical account maps
    ///
    /// Database labels are built from the engine family (`DB (name)`,
    /// `DocumentDB (name)`, `Atlas (name)`) so they line up with the
    /// catalog and change-file labels. Within one database, a duplicate
    /// identity keeps the last row seen.
    pub fn extract_accounts(&self, kind: DatabaseKind) -> AccountMaps {
        let mut result = AccountMaps::new();

        for (db_name, db_data) in &self.databases {
            let accounts = result.entry(kind.label(db_name)).or_default();

            for user in &db_data.users {
                let scope = user
                    .host
                    .clone()
                    .or_else(|| user.db.clone())
                    .unwrap_or_else(|| DEFAULT_SCOPE.to_string());

                let grants = user
                    .grants
                    .clone()
                    .or_else(|| user.roles.clone())
                    .unwrap_or_default();

                let account = CanonicalAccount {
                    user: user.user.clone(),
                    scope,
                    grants,
                    grant_option: user.grant_option,
                };
                accounts.insert(account.key(), account);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json(body: &str) -> Snapshot {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_extract_builds_labels_and_keys() {
        let snapshot = snapshot_json(
            r#"{
                "databases": {
                    "booking-prd": {
                        "users": [
                            {"user": "jade", "host": "%", "grants": "GRANT ALL PRIVILEGES ON *.* TO 'jade'@'%'", "grant_option": true},
                            {"user": "liam", "host": "10.0.%", "grants": "GRANT SELECT ON *.* TO 'liam'@'10.0.%'"}
                        ]
                    }
                }
            }"#,
        );

        let maps = snapshot.extract_accounts(DatabaseKind::Mysql);
        let accounts = maps.get("DB (booking-prd)").unwrap();
        assert_eq!(accounts.len(), 2);

        let jade = accounts
            .get(&AccountKey {
                user: "jade".into(),
                scope: "%".into(),
            })
            .unwrap();
        assert!(jade.grant_option);
    }

    #[test]
    fn test_extract_scope_fallbacks() {
        let snapshot = snapshot_json(
            r#"{
                "databases": {
                    "vendor": {
                        "users": [
                            {"user": "svc", "db": "admin", "roles": ["readWrite"]},
                            {"user": "orphan"}
                        ]
                    }
                }
            }"#,
        );

        let maps = snapshot.extract_accounts(DatabaseKind::Atlas);
        let accounts = maps.get("Atlas (vendor)").unwrap();

        assert!(accounts.contains_key(&AccountKey {
            user: "svc".into(),
            scope: "admin".into(),
        }));
        assert!(accounts.contains_key(&AccountKey {
            user: "orphan".into(),
            scope: DEFAULT_SCOPE.into(),
        }));
    }

    #[test]
    fn test_extract_empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(snapshot.extract_accounts(DatabaseKind::Mysql).is_empty());
    }
}
