//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tally_core::config::resolve_against;
use tally_core::{Config, NamePolicy};
use tally_db::{Database, DuckDbBackend};
use tally_engine::{LedgerStore, MigrateError, Migrator};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main never prints it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

const IN_MEMORY: &str = ":memory:";

/// Resolved settings for one CLI invocation.
#[derive(Debug, Clone)]
pub(crate) struct CommandContext {
    pub(crate) config: Config,
    pub(crate) migrations_dir: PathBuf,
    /// Absolute database path, or `:memory:`
    pub(crate) database: String,
}

impl CommandContext {
    /// Load config and apply CLI overrides. Every path comes out absolute.
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        let root = std::path::absolute(&global.project_dir).with_context(|| {
            format!("Failed to resolve project directory {}", global.project_dir)
        })?;

        let config = match &global.config {
            Some(path) => Config::load(&resolve_against(&root, Path::new(path))),
            None => Config::load_from_dir(&root),
        }
        .context("Failed to load configuration")?;

        let migrations_dir = match &global.migrations_dir {
            Some(dir) => resolve_against(&root, Path::new(dir)),
            None => config.migrations_dir_absolute(&root),
        };

        let database = global
            .database
            .clone()
            .unwrap_or_else(|| config.database.path.clone());
        let database = if database == IN_MEMORY {
            database
        } else {
            resolve_against(&root, Path::new(&database))
                .display()
                .to_string()
        };

        log::debug!(
            "Migrations directory: {}, database: {}",
            migrations_dir.display(),
            database
        );

        Ok(Self {
            config,
            migrations_dir,
            database,
        })
    }

    /// Open the configured DuckDB database, creating the file if needed.
    pub(crate) fn open_database(&self) -> Result<DuckDbBackend> {
        let db = DuckDbBackend::new(&self.database)
            .with_context(|| format!("Failed to open database {}", self.database))?;
        log::debug!("Opened {} database {}", db.db_type(), self.database);
        Ok(db)
    }

    /// Open the database for commands that only read.
    ///
    /// A database file that does not exist yet is not created; an empty
    /// in-memory database stands in for it.
    pub(crate) fn open_database_for_read(&self) -> Result<DuckDbBackend> {
        if self.database == IN_MEMORY || Path::new(&self.database).exists() {
            return self.open_database();
        }
        log::debug!(
            "Database {} does not exist yet; reading from an empty one",
            self.database
        );
        DuckDbBackend::in_memory().context("Failed to open in-memory database")
    }

    /// Migrator over `db` with the configured ledger table and name policy.
    pub(crate) fn migrator<'db>(&self, db: &'db DuckDbBackend) -> Result<Migrator<'db>> {
        let ledger = LedgerStore::with_table(db, &self.config.ledger_table)?;
        Ok(Migrator::new(ledger).with_name_policy(NamePolicy::from_strict(
            self.config.strict_names,
        )))
    }
}

/// Log an engine error and turn it into an exit code.
///
/// A failed COMMIT exits with 3 since the database needs inspection before
/// the next run; every other engine failure exits with 1.
pub(crate) fn engine_failure(err: MigrateError) -> anyhow::Error {
    log::error!("{err}");
    let code = match err {
        MigrateError::Commit { .. } => 3,
        _ => 1,
    };
    ExitCode(code).into()
}

/// Run blocking engine work off the async runtime.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("Migration task panicked")?
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
