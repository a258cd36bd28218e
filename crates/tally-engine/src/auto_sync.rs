//! Auto-sync: bring the baseline application schema up to date without a
//! migrations directory.
//!
//! Applied versions are tracked in `schema_version`. Each unapplied version
//! runs in its own transaction together with its `schema_version` row.

use crate::ddl::{SchemaVersion, SCHEMA_VERSIONS};
use crate::error::{MigrateError, MigrateResult};
use tally_db::{Database, DbError};

const VERSION_TABLE: &str = "schema_version";

fn ensure_version_table(db: &dyn Database) -> MigrateResult<()> {
    db.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version    INTEGER NOT NULL UNIQUE,
             applied_at TIMESTAMP NOT NULL DEFAULT now()
         );",
    )
    .map_err(|e| MigrateError::ledger("schema_version creation", e))
}

/// Highest applied schema version, or 0 if none (or no version table yet).
pub fn current_schema_version(db: &dyn Database) -> MigrateResult<i32> {
    if !db
        .relation_exists(VERSION_TABLE)
        .map_err(|e| MigrateError::ledger("schema_version lookup", e))?
    {
        return Ok(0);
    }

    let rows = db
        .query_rows("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .map_err(|e| MigrateError::ledger("schema_version read", e))?;
    let raw = rows
        .first()
        .and_then(|row| row.first())
        .map(String::as_str)
        .unwrap_or("0");
    raw.parse::<i32>().map_err(|_| {
        MigrateError::ledger(
            "schema_version read",
            DbError::ExecutionError(format!("unexpected version value '{raw}'")),
        )
    })
}

/// Apply every embedded schema version newer than the current one.
///
/// Returns the number of versions applied.
pub fn run_auto_sync(db: &dyn Database) -> MigrateResult<usize> {
    run_versions(db, SCHEMA_VERSIONS)
}

fn run_versions(db: &dyn Database, versions: &[SchemaVersion]) -> MigrateResult<usize> {
    ensure_version_table(db)?;
    let current = current_schema_version(db)?;

    let mut applied = 0;
    for schema in versions {
        if schema.version <= current {
            continue;
        }
        log::debug!(
            "Applying schema v{:03} ({})",
            schema.version,
            schema.description
        );
        apply_version(db, schema)?;
        log::info!(
            "Applied schema v{:03} ({})",
            schema.version,
            schema.description
        );
        applied += 1;
    }

    if applied == 0 {
        log::info!("Schema is up to date at v{current:03}");
    }
    Ok(applied)
}

fn apply_version(db: &dyn Database, schema: &SchemaVersion) -> MigrateResult<()> {
    let failed = |source: DbError| MigrateError::AutoSync {
        version: schema.version,
        source,
    };

    let mut tx = db.begin().map_err(failed)?;
    tx.execute(schema.sql).map_err(failed)?;
    tx.execute_with_params(
        "INSERT INTO schema_version (version) VALUES (CAST(? AS INTEGER))",
        &[schema.version.to_string().as_str()],
    )
    .map_err(failed)?;
    tx.commit().map_err(failed)
}

#[cfg(test)]
#[path = "auto_sync_test.rs"]
mod tests;
