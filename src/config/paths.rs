//! Path management for grantwatch
//!
//! Provides XDG-compliant path resolution for the data directory that holds
//! snapshots, change files, the baseline, and generated reports.
//!
//! ## Path Resolution Order
//!
//! 1. `GRANTWATCH_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_DATA_HOME/grantwatch` or `~/.local/share/grantwatch`
//! 3. Windows: `%APPDATA%\grantwatch`

use std::path::PathBuf;

use crate::error::GrantwatchError;

use super::catalog::DatabaseKind;
use crate::models::Month;

/// Manages all paths used by grantwatch
#[derive(Debug, Clone)]
pub struct GrantwatchPaths {
    /// Base directory for all grantwatch data
    base_dir: PathBuf,
}

impl GrantwatchPaths {
    /// Create a new GrantwatchPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, GrantwatchError> {
        let base_dir = if let Ok(custom) = std::env::var("GRANTWATCH_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create GrantwatchPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config directory
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.join("config")
    }

    /// Get the snapshots directory (one subdirectory per month)
    pub fn snapshots_dir(&self) -> PathBuf {
        self.base_dir.join("snapshots")
    }

    /// Get the changes directory (one file per change day)
    pub fn changes_dir(&self) -> PathBuf {
        self.base_dir.join("changes")
    }

    /// Get the reports directory (one subdirectory per month)
    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    /// Get the path to the baseline file
    pub fn baseline_file(&self) -> PathBuf {
        self.config_dir().join("baseline_accounts.json")
    }

    /// Get the path to the catalog file (tracked databases and aliases)
    pub fn catalog_file(&self) -> PathBuf {
        self.config_dir().join("catalog.json")
    }

    /// Get the path to a snapshot file for a given month and engine family
    pub fn snapshot_file(&self, month: &Month, kind: DatabaseKind) -> PathBuf {
        self.snapshots_dir()
            .join(month.to_string())
            .join(format!("{}_users.json", kind.file_stem()))
    }

    /// Get the path to the consolidated diff/aggregate output payload
    pub fn diff_result_file(&self) -> PathBuf {
        self.base_dir.join("diff_result.json")
    }

    /// Get the path to the audit report for a given month
    pub fn audit_report_file(&self, month: &Month) -> PathBuf {
        self.reports_dir()
            .join(month.to_string())
            .join("audit_report.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), GrantwatchError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| GrantwatchError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.config_dir())
            .map_err(|e| GrantwatchError::Io(format!("Failed to create config directory: {}", e)))?;

        std::fs::create_dir_all(self.snapshots_dir()).map_err(|e| {
            GrantwatchError::Io(format!("Failed to create snapshots directory: {}", e))
        })?;

        std::fs::create_dir_all(self.changes_dir()).map_err(|e| {
            GrantwatchError::Io(format!("Failed to create changes directory: {}", e))
        })?;

        std::fs::create_dir_all(self.reports_dir()).map_err(|e| {
            GrantwatchError::Io(format!("Failed to create reports directory: {}", e))
        })?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, GrantwatchError> {
    // Unix (Linux/macOS): Use XDG_DATA_HOME if set, otherwise ~/.local/share
    let data_base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".local").join("share")
        });
    Ok(data_base.join("grantwatch"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, GrantwatchError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| GrantwatchError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("grantwatch"))
}
