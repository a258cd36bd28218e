//! Status report: discovered files merged with ledger rows.

use crate::ledger::MigrationRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tally_core::{extract_down, split_statements, MigrationFile};

/// Where a migration stands relative to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MigrationState {
    /// On disk and recorded
    Applied { applied_at: DateTime<Utc> },
    /// On disk, not yet recorded
    Pending,
    /// Recorded, but the file is gone from the directory
    Orphaned { applied_at: DateTime<Utc> },
}

impl MigrationState {
    /// Short label used in table output
    pub fn label(&self) -> &'static str {
        match self {
            MigrationState::Applied { .. } => "applied",
            MigrationState::Pending => "pending",
            MigrationState::Orphaned { .. } => "orphaned",
        }
    }

    /// Commit time, if the migration is recorded
    pub fn applied_at(&self) -> Option<DateTime<Utc>> {
        match self {
            MigrationState::Applied { applied_at } | MigrationState::Orphaned { applied_at } => {
                Some(*applied_at)
            }
            MigrationState::Pending => None,
        }
    }
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatusEntry {
    pub name: String,
    #[serde(flatten)]
    pub state: MigrationState,
    /// The file has a `-- Down` section with at least one statement.
    /// Always false for orphaned rows.
    pub has_down: bool,
}

fn has_down_statements(file: &MigrationFile) -> bool {
    extract_down(&file.raw_content).is_some_and(|down| !split_statements(down).is_empty())
}

/// Merge discovered files with ledger records, ordered by name.
pub fn build_status(
    discovered: &[MigrationFile],
    records: Vec<MigrationRecord>,
) -> Vec<MigrationStatusEntry> {
    let mut recorded: BTreeMap<String, DateTime<Utc>> = records
        .into_iter()
        .map(|r| (r.name, r.applied_at))
        .collect();

    let mut entries: Vec<MigrationStatusEntry> = discovered
        .iter()
        .map(|file| {
            let state = match recorded.remove(file.name.as_str()) {
                Some(applied_at) => MigrationState::Applied { applied_at },
                None => MigrationState::Pending,
            };
            MigrationStatusEntry {
                name: file.name.to_string(),
                state,
                has_down: has_down_statements(file),
            }
        })
        .collect();

    entries.extend(
        recorded
            .into_iter()
            .map(|(name, applied_at)| MigrationStatusEntry {
                name,
                state: MigrationState::Orphaned { applied_at },
                has_down: false,
            }),
    );
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
