//! Snapshot diff engine
//!
//! Compares the canonical account maps of two months and produces an
//! ordered list of typed change actions per database. Iteration is
//! lexicographic over database labels and account identities, so identical
//! input always produces identical output.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{summarize_grants, AccountMaps, ChangeAction, DatabaseChanges};

/// Payload written by the `diff` command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPayload {
    pub review_date: NaiveDate,
    pub systems: Vec<DatabaseChanges>,
}

impl DiffPayload {
    /// Whether any database saw an actual change
    pub fn has_changes(&self) -> bool {
        self.systems.iter().any(|s| s.change_count() > 0)
    }
}

/// Compare two canonical account maps
///
/// For every database present on either side, every identity is classified
/// as created, deleted, or permission-changed; identities with equal grants
/// emit nothing. A database with no actions gets a single "no changes"
/// marker so every compared database has a non-empty action list.
///
/// A side with no data for a database is treated as an empty account set,
/// so a missing snapshot shows up as wholesale deletions rather than an
/// error. Callers that want to distinguish the two must check file
/// existence beforehand.
pub fn diff_accounts(prev: &AccountMaps, curr: &AccountMaps) -> Vec<DatabaseChanges> {
    let empty = std::collections::BTreeMap::new();

    let all_dbs: BTreeSet<&String> = prev.keys().chain(curr.keys()).collect();
    let mut changes = Vec::with_capacity(all_dbs.len());

    for db_name in all_dbs {
        let prev_accounts = prev.get(db_name).unwrap_or(&empty);
        let curr_accounts = curr.get(db_name).unwrap_or(&empty);

        let all_keys: BTreeSet<_> = prev_accounts.keys().chain(curr_accounts.keys()).collect();
        let mut actions = Vec::new();

        for key in all_keys {
            match (prev_accounts.get(key), curr_accounts.get(key)) {
                (None, Some(created)) => actions.push(ChangeAction::CreateAccount {
                    account: created.user.clone(),
                    host: Some(created.scope.clone()),
                    note: Some("new".to_string()),
                    role: None,
                    has_grant: created.grant_option,
                }),
                (Some(deleted), None) => actions.push(ChangeAction::DeleteAccount {
                    account: deleted.user.clone(),
                    host: Some(deleted.scope.clone()),
                }),
                (Some(before), Some(after)) => {
                    // Grants are compared as opaque values; summaries are
                    // only produced for the emitted action
                    if before.grants != after.grants {
                        actions.push(ChangeAction::PermissionChange {
                            account: after.user.clone(),
                            host: Some(after.scope.clone()),
                            from: summarize_grants(&before.grants),
                            to: summarize_grants(&after.grants),
                        });
                    }
                }
                // Keys come from the union of both sides
                (None, None) => {}
            }
        }

        if actions.is_empty() {
            actions.push(ChangeAction::Other {
                account: None,
                note: Some("no changes".to_string()),
            });
        }

        changes.push(DatabaseChanges {
            name: db_name.clone(),
            actions,
        });
    }

    changes
}
