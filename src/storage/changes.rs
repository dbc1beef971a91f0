//! Change-file loading
//!
//! Change files live under `changes/` named by the day they were recorded
//! (`YYYY-MM-DD.json`), each holding a list of per-database action lists.
//! Loaders return files sorted by date ascending; the reconciler depends
//! on that ordering because role derivation is state-dependent.

use chrono::NaiveDate;

use crate::config::GrantwatchPaths;
use crate::error::{GrantwatchError, GrantwatchResult};
use crate::models::{DatabaseChanges, Month};

/// One loaded change file, attributed to its recording date
#[derive(Debug, Clone)]
pub struct ChangeFile {
    /// File name, used as the applied-change identifier in baseline metadata
    pub file_name: String,
    pub date: NaiveDate,
    pub databases: Vec<DatabaseChanges>,
}

impl ChangeFile {
    /// Total number of actual changes across all databases
    pub fn change_count(&self) -> usize {
        self.databases.iter().map(|d| d.change_count()).sum()
    }
}

/// Load every change file, sorted by date ascending
///
/// Malformed files are logged and skipped; files whose names do not look
/// like `YYYY-MM-DD.json` are ignored.
pub fn load_all(paths: &GrantwatchPaths) -> GrantwatchResult<Vec<ChangeFile>> {
    load_filtered(paths, |_| true)
}

/// Load the change files of one calendar month, sorted by date ascending
pub fn load_month(paths: &GrantwatchPaths, month: &Month) -> GrantwatchResult<Vec<ChangeFile>> {
    let month = *month;
    load_filtered(paths, move |date| month.contains(date))
}

fn load_filtered<F>(paths: &GrantwatchPaths, keep: F) -> GrantwatchResult<Vec<ChangeFile>>
where
    F: Fn(NaiveDate) -> bool,
{
    let dir = paths.changes_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dir)
        .map_err(|e| GrantwatchError::Io(format!("Failed to read {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();

    for entry in entries {
        let entry =
            entry.map_err(|e| GrantwatchError::Io(format!("Failed to read directory entry: {}", e)))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();

        let Some(date) = parse_change_file_name(&file_name) else {
            continue;
        };
        if !keep(date) {
            continue;
        }

        match super::file_io::read_json_required::<Vec<DatabaseChanges>, _>(entry.path()) {
            Ok(databases) => files.push(ChangeFile {
                file_name,
                date,
                databases,
            }),
            Err(e) => {
                log::warn!("Skipping malformed change file {}: {}", file_name, e);
            }
        }
    }

    files.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.file_name.cmp(&b.file_name)));
    Ok(files)
}

/// Parse a `YYYY-MM-DD.json` file name into its date
fn parse_change_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".json")?;
    if stem.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}
