//! tally-engine - Migration engine for Tally
//!
//! Ties discovery, parsing and the database layer together: the ledger store,
//! the per-file transactional applier, the [`Migrator`] orchestrator, the
//! status report, and the embedded auto-sync schema.

pub mod applier;
pub mod auto_sync;
pub mod ddl;
pub mod error;
pub mod ledger;
pub mod migrator;
pub mod status;

#[cfg(test)]
mod test_support;

pub use applier::apply_migration;
pub use auto_sync::{current_schema_version, run_auto_sync};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{LedgerStore, MigrationRecord, DEFAULT_LEDGER_TABLE};
pub use migrator::{MigrationRunSummary, Migrator};
pub use status::{build_status, MigrationState, MigrationStatusEntry};
