//! Aggregate CLI command
//!
//! Consolidates one month's change files into the review payload and
//! writes it to `diff_result.json`.

use crate::config::{Catalog, GrantwatchPaths};
use crate::error::GrantwatchResult;
use crate::models::Month;
use crate::services::aggregate::aggregate_changes;
use crate::storage::{load_month_changes, write_json_atomic};

/// Handle the aggregate command
pub fn handle_aggregate(
    paths: &GrantwatchPaths,
    catalog: &Catalog,
    month: Option<Month>,
) -> GrantwatchResult<()> {
    let month = month.unwrap_or_else(Month::previous_month);
    println!("Aggregating changes for {}", month);

    let files = load_month_changes(paths, &month)?;
    println!("Loaded {} change files", files.len());

    let payload = aggregate_changes(&month, catalog, &files);

    println!();
    println!(
        "Databases: {} total, {} changed",
        payload.summary.total_databases, payload.summary.changed_databases
    );
    println!("Changes:   {}", payload.summary.total_changes);
    for change in &payload.summary.changes {
        println!("  {} {}: {}", change.date, change.database, change.description);
    }
    println!();
    println!("{}", payload.conclusion);

    let out_path = paths.diff_result_file();
    write_json_atomic(&out_path, &payload)?;
    println!("Payload written to {}", out_path.display());

    Ok(())
}
