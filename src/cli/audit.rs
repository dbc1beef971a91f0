//! Audit CLI command
//!
//! Runs the least-privilege audit for one month and writes the report to
//! `reports/<YYYY-MM>/audit_report.json`.

use crate::config::GrantwatchPaths;
use crate::error::GrantwatchResult;
use crate::models::Month;
use crate::services::audit::build_report;
use crate::storage::{load_month_changes, write_json_atomic, BaselineStore};

/// Handle the audit command
pub fn handle_audit(paths: &GrantwatchPaths, month: Option<Month>) -> GrantwatchResult<()> {
    let month = month.unwrap_or_else(Month::previous_month);
    println!("Auditing {}", month);

    let store = BaselineStore::new(paths.baseline_file());
    let baseline = store.load()?;
    println!("Baseline loaded: {} databases", baseline.databases.len());

    let changes = load_month_changes(paths, &month)?;
    println!("Change files loaded: {}", changes.len());

    let report = build_report(&month, &baseline, &changes);

    let out_path = paths.audit_report_file(&month);
    write_json_atomic(&out_path, &report)?;

    println!();
    println!("Report written to {}", out_path.display());
    println!(
        "Databases: {} (PROD: {}, DEV: {})",
        report.summary.total_databases, report.summary.prod_databases, report.summary.dev_databases
    );
    println!("Accounts:  {}", report.summary.total_accounts);
    println!(
        "Minimum privilege: {} issues",
        report.checks.minimum_privilege.issues.len()
    );
    println!(
        "Role-based access: {} issues",
        report.checks.role_based_access.issues.len()
    );
    println!(
        "Approval records:  {} changes",
        report.checks.approval_records.summary.total_changes
    );
    println!();
    println!("Conclusion: {}", report.conclusion.recommendation);

    Ok(())
}
