//! Transactional applier: one migration file, one transaction.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::LedgerStore;
use chrono::Utc;
use tally_core::MigrationName;
use tally_db::Transaction;

/// Apply `statements` for migration `name` and record it in the ledger, all
/// inside a single transaction.
///
/// On the first failing statement the transaction is rolled back and an
/// [`MigrateError::Apply`] naming the 1-based statement index is returned.
/// The ledger row is inserted only after every statement succeeded. A failed
/// COMMIT surfaces as [`MigrateError::Commit`].
pub fn apply_migration(
    ledger: &LedgerStore<'_>,
    name: &MigrationName,
    statements: &[String],
) -> MigrateResult<()> {
    let mut tx = ledger
        .database()
        .begin()
        .map_err(|e| MigrateError::Transaction {
            file: name.to_string(),
            source: e,
        })?;

    for (i, statement) in statements.iter().enumerate() {
        let index = i + 1;
        log::debug!("{name}: executing statement {index}/{}", statements.len());
        if let Err(source) = tx.execute(statement) {
            rollback(tx, name);
            return Err(MigrateError::Apply {
                file: name.to_string(),
                index,
                statement: statement.clone(),
                source,
            });
        }
    }

    if let Err(e) = ledger.record_applied(tx.as_mut(), name, Utc::now()) {
        rollback(tx, name);
        return Err(e);
    }

    tx.commit().map_err(|e| MigrateError::Commit {
        file: name.to_string(),
        source: e,
    })
}

/// Roll back, logging a rollback failure instead of returning it.
fn rollback(tx: Box<dyn Transaction + '_>, name: &MigrationName) {
    if let Err(e) = tx.rollback() {
        log::warn!("Rollback of {name} failed: {e}");
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
