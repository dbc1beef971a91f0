//! Apply CLI command
//!
//! Reconciles every recorded change file into the baseline and persists
//! the result. A missing baseline is fatal; individual action failures
//! are reported as warnings.

use crate::config::{Catalog, GrantwatchPaths};
use crate::error::GrantwatchResult;
use crate::services::reconcile::apply_changes;
use crate::storage::{load_all_changes, BaselineStore};

/// Handle the apply command
pub fn handle_apply(paths: &GrantwatchPaths, catalog: &Catalog) -> GrantwatchResult<()> {
    let store = BaselineStore::new(paths.baseline_file());
    let mut baseline = store.load()?;
    println!("Baseline loaded: {} databases", baseline.databases.len());

    let files = load_all_changes(paths)?;
    if files.is_empty() {
        println!("No change files found. Baseline left untouched.");
        return Ok(());
    }
    println!("Applying {} change files", files.len());

    let outcome = apply_changes(&mut baseline, catalog, &files)?;
    store.save(&baseline)?;

    println!();
    println!("Applied: {}", outcome.applied);
    println!("Skipped: {}", outcome.skipped);
    if !outcome.warnings.is_empty() {
        println!("Warnings:");
        for warning in &outcome.warnings {
            println!("  - {}", warning);
        }
    }
    println!("Baseline saved to {}", paths.baseline_file().display());

    Ok(())
}
