//! Change actions
//!
//! A change action is a typed record of one account-level event detected by
//! the diff engine or recorded manually in a daily change file. Actions are
//! grouped per database and applied to the baseline in chronological order.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// One account-level change event
///
/// The wire format is internally tagged on `type` with the tags used by the
/// change files (`createAccount`, `deleteAccount`, `permissionChange`,
/// `other`). Unrecognized tags deserialize as `Unknown` so a single bad
/// action never fails the whole file; the reconciler skips them with a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChangeAction {
    /// A new account appeared
    #[serde(rename_all = "camelCase")]
    CreateAccount {
        account: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        host: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
        /// Role to assign on creation; defaults to unknown when omitted
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
        #[serde(default)]
        has_grant: bool,
    },
    /// An existing account disappeared
    DeleteAccount {
        account: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        host: Option<String>,
    },
    /// An account's grants changed; `from`/`to` hold summarized grants
    PermissionChange {
        account: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        host: Option<String>,
        from: String,
        to: String,
    },
    /// A free-form annotation, also used as the "no changes" marker
    Other {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        account: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// Unrecognized action type; skipped with a warning
    #[serde(other)]
    Unknown,
}

impl ChangeAction {
    /// The wire tag of this action
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CreateAccount { .. } => "createAccount",
            Self::DeleteAccount { .. } => "deleteAccount",
            Self::PermissionChange { .. } => "permissionChange",
            Self::Other { .. } => "other",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this action represents an actual change (as opposed to the
    /// "no changes" marker or an unrecognized entry)
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::CreateAccount { .. } | Self::DeleteAccount { .. } | Self::PermissionChange { .. }
        )
    }

    /// One-line human-readable description, used by the monthly rollup
    pub fn describe(&self) -> String {
        match self {
            Self::CreateAccount { account, note, .. } => match note {
                Some(note) => format!("{} account created ({})", account, note),
                None => format!("{} account created", account),
            },
            Self::DeleteAccount { account, .. } => format!("{} account deleted", account),
            Self::PermissionChange {
                account, from, to, ..
            } => format!("{} permission changed: {} -> {}", account, from, to),
            Self::Other { account, note } => format!(
                "{}: {}",
                account.as_deref().unwrap_or("-"),
                note.as_deref().unwrap_or("other")
            ),
            Self::Unknown => "unknown action".to_string(),
        }
    }
}

/// All actions recorded for one database in one change file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseChanges {
    /// Database display label, e.g. `DB (booking-prd)`
    pub name: String,
    pub actions: Vec<ChangeAction>,
}

impl DatabaseChanges {
    /// Number of actual changes (ignores markers and unknown entries)
    pub fn change_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_change()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags() {
        let action = ChangeAction::CreateAccount {
            account: "dana".into(),
            host: Some("%".into()),
            note: Some("new".into()),
            role: None,
            has_grant: false,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "createAccount");
        assert_eq!(json["account"], "dana");

        let back: ChangeAction = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_unknown_type_does_not_fail_parsing() {
        let json = r#"{"type": "renameAccount", "account": "dana"}"#;
        let action: ChangeAction = serde_json::from_str(json).unwrap();
        assert_eq!(action, ChangeAction::Unknown);
        assert!(!action.is_change());
    }

    #[test]
    fn test_describe() {
        let change = ChangeAction::PermissionChange {
            account: "sean".into(),
            host: None,
            from: "ALL".into(),
            to: "SELECT, PROCESS".into(),
        };
        assert_eq!(
            change.describe(),
            "sean permission changed: ALL -> SELECT, PROCESS"
        );

        let delete = ChangeAction::DeleteAccount {
            account: "theo".into(),
            host: None,
        };
        assert_eq!(delete.describe(), "theo account deleted");
    }

    #[test]
    fn test_change_count_skips_markers() {
        let db = DatabaseChanges {
            name: "DB (auth-cluster)".into(),
            actions: vec![
                ChangeAction::Other {
                    account: None,
                    note: Some("no changes".into()),
                },
                ChangeAction::DeleteAccount {
                    account: "theo".into(),
                    host: None,
                },
            ],
        };
        assert_eq!(db.change_count(), 1);
    }
}
