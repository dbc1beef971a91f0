//! Baseline reconciliation
//!
//! Applies a chronologically ordered stream of change actions to the
//! persisted baseline. Each action is processed independently: a duplicate
//! create, a missing account, or an unresolvable database label skips that
//! single action with a warning and never aborts the run. The caller
//! persists the mutated baseline afterwards as one atomic write.

use chrono::{NaiveDate, Utc};

use crate::config::Catalog;
use crate::error::{GrantwatchError, GrantwatchResult};
use crate::models::{derive_role, Baseline, BaselineAccount, BaselineDatabase, ChangeAction};
use crate::storage::ChangeFile;

/// Wildcard host scope assigned to created accounts without an explicit host
const WILDCARD_HOST: &str = "%";

/// Outcome of one reconciliation run
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    /// Actions that mutated the baseline
    pub applied: usize,
    /// Actions skipped (duplicate create, missing account, unknown type,
    /// unresolvable database)
    pub skipped: usize,
    /// Every warning recorded while skipping
    pub warnings: Vec<String>,
}

impl ApplyOutcome {
    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Apply change files to the baseline, in order
///
/// Ascending date order is a verified precondition: role derivation is
/// state-dependent, so out-of-order application would produce a different
/// final state. After all actions are processed the baseline metadata is
/// refreshed with the update timestamp and the list of processed files.
///
/// Re-running over a file already listed in `appliedChanges` is flagged
/// with a warning but still applied; nothing deduplicates change files.
pub fn apply_changes(
    baseline: &mut Baseline,
    catalog: &Catalog,
    files: &[ChangeFile],
) -> GrantwatchResult<ApplyOutcome> {
    verify_chronological(files)?;

    let mut outcome = ApplyOutcome::default();

    for file in files {
        if baseline
            .metadata
            .applied_changes
            .iter()
            .any(|applied| applied == &file.file_name)
        {
            outcome.warn(format!(
                "{} is already listed in appliedChanges; reapplying will double-apply its actions",
                file.file_name
            ));
        }

        for db in &file.databases {
            let Some(db_key) = resolve_database_key(baseline, catalog, &db.name) else {
                outcome.warn(format!("No baseline database matches '{}'", db.name));
                outcome.skipped += db.actions.len();
                continue;
            };

            for action in &db.actions {
                // The key came from the baseline's own key set
                let Some(database) = baseline.databases.get_mut(&db_key) else {
                    continue;
                };
                if apply_action(database, &db_key, action, file.date, &mut outcome) {
                    outcome.applied += 1;
                } else {
                    outcome.skipped += 1;
                }
            }
        }
    }

    baseline.metadata.last_updated = Some(Utc::now());
    baseline.metadata.applied_changes = files.iter().map(|f| f.file_name.clone()).collect();

    Ok(outcome)
}

/// Reject change files that are not sorted by date ascending
fn verify_chronological(files: &[ChangeFile]) -> GrantwatchResult<()> {
    for pair in files.windows(2) {
        if pair[0].date > pair[1].date {
            return Err(GrantwatchError::Validation(format!(
                "Change files must be applied in ascending date order: {} precedes {}",
                pair[1].file_name, pair[0].file_name
            )));
        }
    }
    Ok(())
}

/// Map a change-file database label to a baseline key
///
/// The catalog alias table is consulted first; failing that, substring
/// containment against the baseline keys (in both directions, with the
/// parenthesized inner name extracted from the label).
fn resolve_database_key(baseline: &Baseline, catalog: &Catalog, label: &str) -> Option<String> {
    if let Some(mapped) = catalog.alias(label) {
        if baseline.databases.contains_key(mapped) {
            return Some(mapped.to_string());
        }
    }

    let inner = inner_name(label);
    baseline
        .databases
        .keys()
        .find(|key| label.contains(key.as_str()) || key.contains(inner))
        .cloned()
}

/// Extract the parenthesized database name from a label like `DB (auth-cluster)`
fn inner_name(label: &str) -> &str {
    match (label.find('('), label.rfind(')')) {
        (Some(open), Some(close)) if open < close => &label[open + 1..close],
        _ => label,
    }
}

/// Apply a single action to a resolved baseline database
///
/// Returns whether the baseline was mutated.
fn apply_action(
    db: &mut BaselineDatabase,
    db_key: &str,
    action: &ChangeAction,
    date: NaiveDate,
    outcome: &mut ApplyOutcome,
) -> bool {
    match action {
        ChangeAction::CreateAccount {
            account,
            host,
            note,
            role,
            has_grant,
        } => {
            if db.account(account).is_some() {
                outcome.warn(format!("{}: account {} already exists", db_key, account));
                return false;
            }
            let audit_note = match note {
                Some(note) => format!("{} {}", date, note),
                None => format!("{} created", date),
            };
            db.accounts.push(BaselineAccount {
                user: account.clone(),
                hosts: host.clone().unwrap_or_else(|| WILDCARD_HOST.to_string()),
                role: role.unwrap_or_default(),
                has_grant: *has_grant,
                note: audit_note,
            });
            log::info!("{}: account {} created", db_key, account);
            true
        }

        ChangeAction::DeleteAccount { account, .. } => {
            if db.remove_account(account).is_some() {
                log::info!("{}: account {} deleted", db_key, account);
                true
            } else {
                outcome.warn(format!("{}: account {} not found", db_key, account));
                false
            }
        }

        ChangeAction::PermissionChange {
            account, from, to, ..
        } => {
            let Some(acc) = db.account_mut(account) else {
                outcome.warn(format!("{}: account {} not found", db_key, account));
                return false;
            };

            let (role, has_grant) = derive_role(to, acc.role);
            acc.role = role;
            acc.has_grant = has_grant;
            acc.note = format!("{} permission change: {} -> {}", date, from, to);
            log::info!(
                "{}: account {} permission change ({} -> {})",
                db_key,
                account,
                from,
                to
            );
            true
        }

        ChangeAction::Other { account, note } => {
            if let (Some(account), Some(note)) = (account, note) {
                if let Some(acc) = db.account_mut(account) {
                    acc.note = format!("{} {}", date, note);
                    return true;
                }
            }
            false
        }

        ChangeAction::Unknown => {
            outcome.warn(format!("{}: unknown action type, skipped", db_key));
            false
        }
    }
}
