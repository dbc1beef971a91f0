//! Snapshot file loading
//!
//! Snapshots live under `snapshots/<YYYY-MM>/<kind>_users.json`, one file
//! per engine family per month. A missing or malformed snapshot is not an
//! error at this layer: the diff treats that side as an empty account set.

use crate::config::{DatabaseKind, GrantwatchPaths};
use crate::models::{AccountMaps, Month, Snapshot};

/// Load one snapshot file, if present and parseable
///
/// Malformed files are logged and treated as missing.
pub fn load_snapshot(
    paths: &GrantwatchPaths,
    month: &Month,
    kind: DatabaseKind,
) -> Option<Snapshot> {
    let path = paths.snapshot_file(month, kind);
    if !path.exists() {
        return None;
    }

    match super::file_io::read_json_required(&path) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("Skipping malformed snapshot {}: {}", path.display(), e);
            None
        }
    }
}

/// Load and merge the canonical account maps of every engine family for
/// one month
///
/// Families that have no snapshot contribute nothing; their databases will
/// appear as wholly created or deleted when diffed against a month that
/// has them.
pub fn load_month_accounts(paths: &GrantwatchPaths, month: &Month) -> AccountMaps {
    let mut merged = AccountMaps::new();

    for kind in DatabaseKind::ALL {
        if let Some(snapshot) = load_snapshot(paths, month, kind) {
            merged.extend(snapshot.extract_accounts(kind));
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_snapshot(paths: &GrantwatchPaths, month: &Month, kind: DatabaseKind, body: &str) {
        let path = paths.snapshot_file(month, kind);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GrantwatchPaths::with_base_dir(temp_dir.path().to_path_buf());
        let month = Month::new(2025, 7);

        assert!(load_snapshot(&paths, &month, DatabaseKind::Mysql).is_none());
        assert!(load_month_accounts(&paths, &month).is_empty());
    }

    #[test]
    fn test_malformed_snapshot_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GrantwatchPaths::with_base_dir(temp_dir.path().to_path_buf());
        let month = Month::new(2025, 7);

        write_snapshot(&paths, &month, DatabaseKind::Mysql, "not json");
        assert!(load_snapshot(&paths, &month, DatabaseKind::Mysql).is_none());
    }

    #[test]
    fn test_merge_across_kinds() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GrantwatchPaths::with_base_dir(temp_dir.path().to_path_buf());
        let month = Month::new(2025, 7);

        write_snapshot(
            &paths,
            &month,
            DatabaseKind::Mysql,
            r#"{"databases": {"auth-cluster": {"users": [{"user": "jade", "host": "%"}]}}}"#,
        );
        write_snapshot(
            &paths,
            &month,
            DatabaseKind::Atlas,
            r#"{"databases": {"vendor": {"users": [{"user": "svc", "db": "admin"}]}}}"#,
        );

        let maps = load_month_accounts(&paths, &month);
        assert_eq!(maps.len(), 2);
        assert!(maps.contains_key("DB (auth-cluster)"));
        assert!(maps.contains_key("Atlas (vendor)"));
    }
}
