//! Account role classification
//!
//! Roles are coarse labels assigned to baseline accounts for audit purposes.
//! When a permission change is reconciled, the new role is derived from the
//! summarized grants through an ordered rule table, first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a database account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Dba,
    /// Read-write application or human access
    Write,
    /// Read-only access
    Read,
    /// Human developer account
    Developer,
    /// Monitoring/observability account
    Monitor,
    /// Application service account
    Service,
    /// Replication account
    Replication,
    /// Schema migration account
    Migrator,
    /// Test account
    Test,
    /// Unclassified account
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Dba => "dba",
            Self::Write => "write",
            Self::Read => "read",
            Self::Developer => "developer",
            Self::Monitor => "monitor",
            Self::Service => "service",
            Self::Replication => "replication",
            Self::Migrator => "migrator",
            Self::Test => "test",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Privilege markers scanned from an upper-cased grants summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantMarkers {
    pub all: bool,
    pub grant: bool,
    pub select: bool,
    pub insert: bool,
    pub update: bool,
}

impl GrantMarkers {
    /// Scan a grants summary for the markers the role rules look at
    pub fn scan(summary: &str) -> Self {
        let upper = summary.to_uppercase();
        Self {
            all: upper.contains("ALL"),
            grant: upper.contains("GRANT"),
            select: upper.contains("SELECT"),
            insert: upper.contains("INSERT"),
            update: upper.contains("UPDATE"),
        }
    }
}

/// One entry of the role derivation table
struct RoleRule {
    /// Rule name, for documentation and test failure output
    name: &'static str,
    matches: fn(&GrantMarkers) -> bool,
    /// Role to assign; `None` leaves the current role untouched
    role: Option<Role>,
    /// Grant-option flag to assign; `None` derives it from the grant marker
    grant_option: Option<bool>,
}

/// Ordered role derivation rules, first match wins
const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        name: "all-with-grant-option",
        matches: |m| m.all && m.grant,
        role: Some(Role::Dba),
        grant_option: Some(true),
    },
    RoleRule {
        name: "all-privileges",
        matches: |m| m.all,
        role: Some(Role::Write),
        grant_option: Some(false),
    },
    RoleRule {
        name: "read-only",
        matches: |m| m.select && !m.insert && !m.update,
        role: Some(Role::Read),
        grant_option: Some(false),
    },
    RoleRule {
        name: "mixed-privileges",
        matches: |_| true,
        role: None,
        grant_option: None,
    },
];

/// Derive the role and grant-option flag implied by a new grants summary
///
/// `current` is the account's role before the change; rules that do not
/// classify the summary leave it untouched.
pub fn derive_role(summary: &str, current: Role) -> (Role, bool) {
    let markers = GrantMarkers::scan(summary);

    for rule in ROLE_RULES {
        if (rule.matches)(&markers) {
            log::debug!("role rule '{}' matched for summary '{}'", rule.name, summary);
            return (
                rule.role.unwrap_or(current),
                rule.grant_option.unwrap_or(markers.grant),
            );
        }
    }

    // The table ends with a catch-all rule
    (current, markers.grant)
}
