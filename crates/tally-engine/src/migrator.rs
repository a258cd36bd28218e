//! Orchestrator: decides which files are pending and applies them in order.

use crate::applier::apply_migration;
use crate::error::MigrateResult;
use crate::ledger::LedgerStore;
use crate::status::{build_status, MigrationStatusEntry};
use std::path::Path;
use std::time::{Duration, Instant};
use tally_core::{extract_up, list_migrations, load_migration, split_statements};
use tally_core::{MigrationName, NamePolicy};

/// Outcome of a successful [`Migrator::apply_all`] run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRunSummary {
    /// Files applied by this run, in application order
    pub applied: Vec<MigrationName>,
    /// Files already in the ledger
    pub skipped: Vec<MigrationName>,
    pub elapsed: Duration,
}

/// Applies a directory of migration files against one ledger.
pub struct Migrator<'db> {
    ledger: LedgerStore<'db>,
    policy: NamePolicy,
}

impl<'db> Migrator<'db> {
    pub fn new(ledger: LedgerStore<'db>) -> Self {
        Self {
            ledger,
            policy: NamePolicy::default(),
        }
    }

    /// Set how non-conforming file names are treated
    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn ledger(&self) -> &LedgerStore<'db> {
        &self.ledger
    }

    /// Apply every pending migration in `dir`, oldest first.
    ///
    /// Stops at the first error. Files committed before the failure stay
    /// applied and recorded; later files are never attempted.
    pub fn apply_all(&self, dir: &Path) -> MigrateResult<MigrationRunSummary> {
        let start = Instant::now();

        self.ledger.ensure_table()?;
        let applied_names = self.ledger.applied_names()?;
        let candidates = list_migrations(dir, self.policy)?;
        log::debug!(
            "Found {} migration file(s) in {}, {} recorded in ledger '{}'",
            candidates.len(),
            dir.display(),
            applied_names.len(),
            self.ledger.table()
        );

        let mut summary = MigrationRunSummary {
            applied: Vec::new(),
            skipped: Vec::new(),
            elapsed: Duration::ZERO,
        };

        for name in candidates {
            if applied_names.contains(name.as_str()) {
                log::info!("Skipping {name}: already applied");
                summary.skipped.push(name);
                continue;
            }

            match name.description() {
                Some(description) => log::debug!("Applying {name} ({description})"),
                None => log::debug!("Applying {name}"),
            }
            let file = load_migration(dir, &name)?;
            let statements = split_statements(extract_up(&file.raw_content));
            if statements.is_empty() {
                log::info!("{name} has no statements to run; recording it as applied");
            }

            apply_migration(&self.ledger, &name, &statements)?;
            log::info!("Applied {name} ({} statement(s))", statements.len());
            summary.applied.push(name);
        }

        summary.elapsed = start.elapsed();
        log::info!(
            "Migrations complete: {} applied, {} already applied ({:.2}s)",
            summary.applied.len(),
            summary.skipped.len(),
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    /// Names of files in `dir` not yet in the ledger, in application order.
    ///
    /// Read-only: a missing ledger table is not created.
    pub fn pending(&self, dir: &Path) -> MigrateResult<Vec<MigrationName>> {
        let candidates = list_migrations(dir, self.policy)?;
        if !self.ledger.exists()? {
            return Ok(candidates);
        }
        let applied_names = self.ledger.applied_names()?;
        Ok(candidates
            .into_iter()
            .filter(|name| !applied_names.contains(name.as_str()))
            .collect())
    }

    /// Applied, pending and orphaned migrations for `dir`.
    ///
    /// Read-only: a missing ledger table is not created.
    pub fn status(&self, dir: &Path) -> MigrateResult<Vec<MigrationStatusEntry>> {
        let files = list_migrations(dir, self.policy)?
            .iter()
            .map(|name| load_migration(dir, name))
            .collect::<Result<Vec<_>, _>>()?;
        let records = if self.ledger.exists()? {
            self.ledger.applied_records()?
        } else {
            Vec::new()
        };
        Ok(build_status(&files, records))
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
