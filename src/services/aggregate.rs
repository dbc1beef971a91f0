//! Monthly change aggregation
//!
//! Consolidates the daily change files of one calendar month into a single
//! report payload. Every database in the catalog gets a status entry, so a
//! month with no recorded changes still produces a complete payload.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Catalog;
use crate::models::{ChangeAction, Month};
use crate::storage::ChangeFile;

/// Aggregation status of one catalog database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Changed,
    NoChange,
}

/// One change line in the summary section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryChange {
    pub database: String,
    pub date: NaiveDate,
    pub description: String,
}

/// Summary counters of the monthly payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub total_databases: usize,
    pub checked_databases: usize,
    pub changed_databases: usize,
    pub total_changes: usize,
    pub changes: Vec<SummaryChange>,
}

/// One dated action inside a detail entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailAction {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub action_type: String,
    pub description: String,
}

/// Per-database detail entry; present for every catalog database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseDetail {
    pub database: String,
    pub status: ChangeStatus,
    pub actions: Vec<DetailAction>,
}

/// The consolidated monthly payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatePayload {
    pub period: Month,
    pub summary: AggregateSummary,
    pub details: Vec<DatabaseDetail>,
    pub conclusion: String,
}

/// Merge a month's change files into the consolidated payload
///
/// Actions are grouped by database label with their recording date
/// preserved. The `details` list covers the whole catalog; databases
/// without any recorded action are marked `no_change`.
pub fn aggregate_changes(month: &Month, catalog: &Catalog, files: &[ChangeFile]) -> AggregatePayload {
    // Group (date, action) pairs by database label
    let mut by_database: BTreeMap<String, Vec<(NaiveDate, ChangeAction)>> = BTreeMap::new();

    for file in files {
        for db in &file.databases {
            let entries = by_database.entry(db.name.clone()).or_default();
            for action in &db.actions {
                entries.push((file.date, action.clone()));
            }
        }
    }

    let mut changes = Vec::new();
    for (database, entries) in &by_database {
        for (date, action) in entries {
            changes.push(SummaryChange {
                database: database.clone(),
                date: *date,
                description: action.describe(),
            });
        }
    }

    let mut details = Vec::with_capacity(catalog.len());
    for database in &catalog.databases {
        let entries = by_database.get(database).map(Vec::as_slice).unwrap_or(&[]);
        let status = if entries.is_empty() {
            ChangeStatus::NoChange
        } else {
            ChangeStatus::Changed
        };
        details.push(DatabaseDetail {
            database: database.clone(),
            status,
            actions: entries
                .iter()
                .map(|(date, action)| DetailAction {
                    date: *date,
                    action_type: action.type_name().to_string(),
                    description: action.describe(),
                })
                .collect(),
        });
    }

    let changed_databases = by_database.len();
    let total_changes = changes.len();

    let mut conclusion = format!("{} database account review complete.", month);
    if total_changes > 0 {
        conclusion.push_str(&format!(
            " {} databases with {} changes.",
            changed_databases, total_changes
        ));
    } else {
        conclusion.push_str(" No changes.");
    }

    AggregatePayload {
        period: *month,
        summary: AggregateSummary {
            total_databases: catalog.len(),
            checked_databases: catalog.len(),
            changed_databases,
            total_changes,
            changes,
        },
        details,
        conclusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DatabaseChanges;

    fn change_file(date: (i32, u32, u32), databases: Vec<DatabaseChanges>) -> ChangeFile {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        ChangeFile {
            file_name: format!("{}.json", date),
            date,
            databases,
        }
    }

    fn delete(account: &str) -> ChangeAction {
        ChangeAction::DeleteAccount {
            account: account.to_string(),
            host: None,
        }
    }

    #[test]
    fn test_empty_month_covers_full_catalog() {
        let catalog = Catalog::default();
        let month = Month::new(2025, 7);

        let payload = aggregate_changes(&month, &catalog, &[]);

        assert_eq!(payload.summary.total_databases, catalog.len());
        assert_eq!(payload.summary.checked_databases, catalog.len());
        assert_eq!(payload.summary.changed_databases, 0);
        assert_eq!(payload.summary.total_changes, 0);
        assert_eq!(payload.details.len(), catalog.len());
        assert!(payload
            .details
            .iter()
            .all(|d| d.status == ChangeStatus::NoChange));
        assert_eq!(
            payload.conclusion,
            "2025-07 database account review complete. No changes."
        );
    }

    #[test]
    fn test_changes_are_grouped_and_counted() {
        let catalog = Catalog::default();
        let month = Month::new(2025, 7);

        let files = vec![
            change_file(
                (2025, 7, 3),
                vec![DatabaseChanges {
                    name: "DB (auth-cluster)".into(),
                    actions: vec![delete("theo")],
                }],
            ),
            change_file(
                (2025, 7, 20),
                vec![
                    DatabaseChanges {
                        name: "DB (auth-cluster)".into(),
                        actions: vec![delete("robin")],
                    },
                    DatabaseChanges {
                        name: "Atlas (vendor)".into(),
                        actions: vec![ChangeAction::CreateAccount {
                            account: "svc".into(),
                            host: None,
                            note: Some("new".into()),
                            role: None,
                            has_grant: false,
                        }],
                    },
                ],
            ),
        ];

        let payload = aggregate_changes(&month, &catalog, &files);

        assert_eq!(payload.summary.changed_databases, 2);
        assert_eq!(payload.summary.total_changes, 3);
        assert_eq!(payload.details.len(), catalog.len());
        assert_eq!(
            payload.conclusion,
            "2025-07 database account review complete. 2 databases with 3 changes."
        );

        let auth = payload
            .details
            .iter()
            .find(|d| d.database == "DB (auth-cluster)")
            .unwrap();
        assert_eq!(auth.status, ChangeStatus::Changed);
        assert_eq!(auth.actions.len(), 2);
        assert_eq!(auth.actions[0].action_type, "deleteAccount");
        assert_eq!(auth.actions[0].description, "theo account deleted");

        let untouched = payload
            .details
            .iter()
            .find(|d| d.database == "DB (onda-sms)")
            .unwrap();
        assert_eq!(untouched.status, ChangeStatus::NoChange);
        assert!(untouched.actions.is_empty());
    }

    #[test]
    fn test_wire_format() {
        let catalog = Catalog::default();
        let payload = aggregate_changes(&Month::new(2025, 7), &catalog, &[]);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["period"], "2025-07");
        assert_eq!(json["summary"]["total_databases"], 14);
        assert_eq!(json["details"][0]["status"], "no_change");
    }
}
