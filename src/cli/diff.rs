//! Diff CLI command
//!
//! Compares two months of snapshots and writes the resulting change list
//! to `diff_result.json`. The "changes detected" boolean is printed and,
//! when running under GitHub Actions, appended to `$GITHUB_OUTPUT` for
//! downstream workflow branching.

use std::io::Write;

use crate::config::GrantwatchPaths;
use crate::error::GrantwatchResult;
use crate::models::Month;
use crate::services::diff::{diff_accounts, DiffPayload};
use crate::storage::{load_month_accounts, write_json_atomic};

/// Handle the diff command
pub fn handle_diff(paths: &GrantwatchPaths, prev: Month, curr: Month) -> GrantwatchResult<()> {
    println!("Comparing snapshots: {} -> {}", prev, curr);

    let prev_accounts = load_month_accounts(paths, &prev);
    let curr_accounts = load_month_accounts(paths, &curr);

    println!(
        "Loaded {} databases for {}, {} for {}",
        prev_accounts.len(),
        prev,
        curr_accounts.len(),
        curr
    );

    let payload = DiffPayload {
        review_date: chrono::Local::now().date_naive(),
        systems: diff_accounts(&prev_accounts, &curr_accounts),
    };

    for system in &payload.systems {
        println!();
        println!("{}:", system.name);
        for action in &system.actions {
            println!("  - {}", action.describe());
        }
    }

    let out_path = paths.diff_result_file();
    write_json_atomic(&out_path, &payload)?;
    println!();
    println!("Diff written to {}", out_path.display());

    let has_changes = payload.has_changes();
    println!("Changes detected: {}", has_changes);
    write_github_output(has_changes)?;

    Ok(())
}

/// Append `has_changes=<bool>` to the GitHub Actions output file, if any
fn write_github_output(has_changes: bool) -> GrantwatchResult<()> {
    let Ok(output_path) = std::env::var("GITHUB_OUTPUT") else {
        return Ok(());
    };

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)?;
    writeln!(file, "has_changes={}", has_changes)?;

    Ok(())
}
