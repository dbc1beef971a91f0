//! Least-privilege audit
//!
//! Evaluates the reconciled baseline against the access-review rules and
//! summarizes the month's approval trail from the change files. DEV
//! databases are exempt from the privilege rules; they still count in the
//! report summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Baseline, ChangeAction, Environment, Month, Role};
use crate::storage::ChangeFile;

/// More `dba` accounts than this on one database raises an issue
const DBA_THRESHOLD: usize = 3;

const STATUS_CHECKED: &str = "checked";
const STATUS_COVERED: &str = "covered_by_changes";

const RECOMMENDATION_ISSUES: &str = "Issues found that require review. See details.";
const RECOMMENDATION_CLEAN: &str = "Least-privilege review complete. No findings.";

/// Audit rule identifiers, used as the issue tag on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditRule {
    ExcessiveDba,
    NonDbaWithGrant,
    UnknownRole,
}

/// One audit finding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditIssue {
    pub database: String,
    #[serde(rename = "type")]
    pub rule: AuditRule,
    pub message: String,
    /// The single offending account, for per-account rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_role: Option<Role>,
    /// The full offending account list, for aggregate rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetadata {
    pub report_date: DateTime<Utc>,
    pub target_month: Month,
    pub baseline_version: String,
    pub baseline_generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_databases: usize,
    pub prod_databases: usize,
    pub dev_databases: usize,
    pub total_accounts: usize,
}

/// A rule-based check section: the privilege and role checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCheck {
    pub status: String,
    pub issues: Vec<AuditIssue>,
}

/// One account touched during the month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalEntry {
    pub date: chrono::NaiveDate,
    pub database: String,
    pub account: String,
}

/// A permission change recorded during the month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalModification {
    pub date: chrono::NaiveDate,
    pub database: String,
    pub account: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSummary {
    pub total_changes: usize,
    pub added_accounts: Vec<ApprovalEntry>,
    pub removed_accounts: Vec<ApprovalEntry>,
    pub modified_accounts: Vec<ApprovalModification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalCheck {
    pub status: String,
    pub summary: ApprovalSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageNote {
    pub status: String,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditChecks {
    pub minimum_privilege: RuleCheck,
    pub role_based_access: RuleCheck,
    pub approval_records: ApprovalCheck,
    pub organization_changes: CoverageNote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditConclusion {
    pub has_issues: bool,
    pub issue_count: usize,
    pub recommendation: String,
}

/// The report written to `reports/<YYYY-MM>/audit_report.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub metadata: AuditMetadata,
    pub summary: AuditSummary,
    pub checks: AuditChecks,
    pub conclusion: AuditConclusion,
}

/// Run the audit over a baseline and the target month's change files
pub fn build_report(month: &Month, baseline: &Baseline, changes: &[ChangeFile]) -> AuditReport {
    let minimum_privilege = RuleCheck {
        status: STATUS_CHECKED.to_string(),
        issues: check_minimum_privilege(baseline),
    };
    let role_based_access = RuleCheck {
        status: STATUS_CHECKED.to_string(),
        issues: check_role_based_access(baseline),
    };

    let issue_count = minimum_privilege.issues.len() + role_based_access.issues.len();
    let has_issues = issue_count > 0;

    AuditReport {
        metadata: AuditMetadata {
            report_date: Utc::now(),
            target_month: *month,
            baseline_version: baseline.metadata.version.clone(),
            baseline_generated_at: baseline.metadata.generated_at,
        },
        summary: AuditSummary {
            total_databases: baseline.databases.len(),
            prod_databases: baseline.count_environment(Environment::Prod),
            dev_databases: baseline.count_environment(Environment::Dev),
            total_accounts: baseline.total_accounts(),
        },
        checks: AuditChecks {
            minimum_privilege,
            role_based_access,
            approval_records: ApprovalCheck {
                status: STATUS_CHECKED.to_string(),
                summary: summarize_approvals(changes),
            },
            organization_changes: CoverageNote {
                status: STATUS_COVERED.to_string(),
                note: "Covered by account additions and removals in the change files".to_string(),
            },
        },
        conclusion: AuditConclusion {
            has_issues,
            issue_count,
            recommendation: if has_issues {
                RECOMMENDATION_ISSUES.to_string()
            } else {
                RECOMMENDATION_CLEAN.to_string()
            },
        },
    }
}

/// Minimum-privilege rules: `excessive_dba` and `non_dba_with_grant`
fn check_minimum_privilege(baseline: &Baseline) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    for (db_name, db) in &baseline.databases {
        if db.environment == Environment::Dev {
            continue;
        }

        let dba_accounts = db.accounts_with_role(Role::Dba);
        if dba_accounts.len() > DBA_THRESHOLD {
            issues.push(AuditIssue {
                database: db_name.clone(),
                rule: AuditRule::ExcessiveDba,
                message: format!(
                    "{} dba accounts exceeds the threshold of {}",
                    dba_accounts.len(),
                    DBA_THRESHOLD
                ),
                account: None,
                account_role: None,
                accounts: dba_accounts.iter().map(|a| a.user.clone()).collect(),
            });
        }

        for acc in db.accounts.iter().filter(|a| a.has_grant) {
            if acc.role != Role::Dba {
                issues.push(AuditIssue {
                    database: db_name.clone(),
                    rule: AuditRule::NonDbaWithGrant,
                    message: "Non-dba account holds the grant option".to_string(),
                    account: Some(acc.user.clone()),
                    account_role: Some(acc.role),
                    accounts: Vec::new(),
                });
            }
        }
    }

    issues
}

/// Role-based-access rule: `unknown_role`
fn check_role_based_access(baseline: &Baseline) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    for (db_name, db) in &baseline.databases {
        if db.environment == Environment::Dev {
            continue;
        }

        for acc in db.accounts.iter().filter(|a| a.role == Role::Unknown) {
            issues.push(AuditIssue {
                database: db_name.clone(),
                rule: AuditRule::UnknownRole,
                message: "Account role is undefined".to_string(),
                account: Some(acc.user.clone()),
                account_role: None,
                accounts: Vec::new(),
            });
        }
    }

    issues
}

/// Classify the month's actions into added, removed, and modified accounts
///
/// Only actual changes count toward the total; "no changes" markers and
/// unknown action types are ignored.
fn summarize_approvals(changes: &[ChangeFile]) -> ApprovalSummary {
    let mut summary = ApprovalSummary::default();

    for file in changes {
        for db in &file.databases {
            for action in &db.actions {
                match action {
                    ChangeAction::CreateAccount { account, .. } => {
                        summary.total_changes += 1;
                        summary.added_accounts.push(ApprovalEntry {
                            date: file.date,
                            database: db.name.clone(),
                            account: account.clone(),
                        });
                    }
                    ChangeAction::DeleteAccount { account, .. } => {
                        summary.total_changes += 1;
                        summary.removed_accounts.push(ApprovalEntry {
                            date: file.date,
                            database: db.name.clone(),
                            account: account.clone(),
                        });
                    }
                    ChangeAction::PermissionChange {
                        account, from, to, ..
                    } => {
                        summary.total_changes += 1;
                        summary.modified_accounts.push(ApprovalModification {
                            date: file.date,
                            database: db.name.clone(),
                            account: account.clone(),
                            from: from.clone(),
                            to: to.clone(),
                        });
                    }
                    ChangeAction::Other { .. } | ChangeAction::Unknown => {}
                }
            }
        }
    }

    summary
}
