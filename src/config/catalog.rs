//! Tracked-database catalog
//!
//! The catalog is the closed list of databases covered by the monthly review,
//! together with an alias table mapping the labels used in change files to
//! the keys used in the baseline. Monthly aggregation reports a status for
//! every catalog entry, including databases that saw no changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::GrantwatchPaths;
use crate::error::GrantwatchError;
use crate::storage::file_io;

/// Database engine family a snapshot was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    /// MySQL-compatible engines (Aurora, RDS)
    Mysql,
    /// Amazon DocumentDB
    DocDb,
    /// MongoDB Atlas
    Atlas,
}

impl DatabaseKind {
    /// All snapshot kinds, in the order they are loaded
    pub const ALL: [DatabaseKind; 3] = [Self::Mysql, Self::DocDb, Self::Atlas];

    /// File name stem used for snapshot files of this kind
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::DocDb => "docdb",
            Self::Atlas => "atlas",
        }
    }

    /// Label prefix used when naming databases of this kind in change files
    pub fn label_prefix(&self) -> &'static str {
        match self {
            Self::Mysql => "DB",
            Self::DocDb => "DocumentDB",
            Self::Atlas => "Atlas",
        }
    }

    /// Build the display label for a database of this kind
    pub fn label(&self, db_name: &str) -> String {
        format!("{} ({})", self.label_prefix(), db_name)
    }
}

/// The closed catalog of tracked databases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Display labels of every tracked database
    pub databases: Vec<String>,

    /// Change-file label to baseline key overrides, consulted before
    /// substring matching during reconciliation
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Catalog {
    /// Load the catalog from the config directory, creating the file with
    /// default contents if it does not exist yet
    pub fn load_or_create(paths: &GrantwatchPaths) -> Result<Self, GrantwatchError> {
        let path = paths.catalog_file();
        if path.exists() {
            file_io::read_json_required(&path)
        } else {
            let catalog = Self::default();
            file_io::write_json_atomic(&path, &catalog)?;
            Ok(catalog)
        }
    }

    /// Number of tracked databases
    pub fn len(&self) -> usize {
        self.databases.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Resolve a change-file label through the alias table
    pub fn alias(&self, label: &str) -> Option<&str> {
        self.aliases.get(label).map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let databases = [
            "DB (onda-aurora-cluster)",
            "DB (onda-standard-property)",
            "DB (onda-sms)",
            "DB (b2e-rds-prd-cluster)",
            "DB (auth-cluster)",
            "DB (onda-plus-cluster)",
            "DB (onda-backoffice)",
            "DB (booking-prd)",
            "DB (obs-system)",
            "DB (cms-cde-reservaion-api)",
            "DB (onda-voucher)",
            "DocumentDB (EVCMS)",
            "Atlas (onda-notification)",
            "Atlas (vendor)",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let aliases = [
            ("DB (onda-aurora-cluster)", "onda-aurora"),
            ("DB (onda-standard-property)", "onda-standard-property"),
            ("DB (onda-sms)", "onda-sms"),
            ("DB (b2e-rds-prd-cluster)", "b2e-rds-prd"),
            ("DB (auth-cluster)", "auth-cluster"),
            ("DB (onda-plus-cluster)", "onda-plus"),
            ("DB (onda-backoffice)", "backoffice"),
            ("DB (booking-prd)", "booking-prd"),
            ("DB (obs-system)", "obs-systemCDE,misc,cms"),
            ("DB (cms-cde-reservaion-api)", "cms-cde-reservaion-api"),
            ("DB (onda-voucher)", "onda-voucher"),
            ("DocumentDB (EVCMS)", "EVCMS"),
            ("Atlas (onda-notification)", "onda-notification"),
            ("Atlas (vendor)", "Vendor"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { databases, aliases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 14);
        assert_eq!(catalog.alias("DB (onda-aurora-cluster)"), Some("onda-aurora"));
        assert_eq!(catalog.alias("DB (nope)"), None);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GrantwatchPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let catalog = Catalog::load_or_create(&paths).unwrap();
        assert_eq!(catalog.len(), 14);
        assert!(paths.catalog_file().exists());

        // Second load reads the persisted file
        let again = Catalog::load_or_create(&paths).unwrap();
        assert_eq!(again.databases, catalog.databases);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(DatabaseKind::Mysql.label("booking-prd"), "DB (booking-prd)");
        assert_eq!(DatabaseKind::DocDb.label("EVCMS"), "DocumentDB (EVCMS)");
        assert_eq!(DatabaseKind::Atlas.label("vendor"), "Atlas (vendor)");
    }
}
