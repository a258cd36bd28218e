//! Error types for the migration engine.
//!
//! Every variant is fatal to the run that produced it. Files committed by
//! earlier iterations stay applied and recorded.

use tally_core::CoreError;
use tally_db::DbError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Listing or reading migration files failed; nothing was applied (M001).
    #[error("[M001] Migration discovery failed: {0}")]
    Discovery(#[from] CoreError),

    /// Creating, reading, or writing the ledger failed (M002).
    ///
    /// A duplicate name on insert lands here: two runners raced on the same
    /// file and this one lost.
    #[error("[M002] Migration ledger {operation} failed: {source}")]
    Ledger {
        operation: String,
        #[source]
        source: DbError,
    },

    /// The ledger table name is not a plain identifier (M003).
    #[error("[M003] Invalid ledger table name '{0}'")]
    InvalidLedgerTable(String),

    /// A transaction for the file could not be started (M004).
    #[error("[M004] Failed to start transaction for migration {file}: {source}")]
    Transaction {
        file: String,
        #[source]
        source: DbError,
    },

    /// A statement failed; the file's transaction was rolled back (M005).
    #[error("[M005] Failed to apply migration {file} at statement {index}: {source}\nStatement: {statement}")]
    Apply {
        file: String,
        /// 1-based position of the failing statement within the file
        index: usize,
        statement: String,
        #[source]
        source: DbError,
    },

    /// COMMIT failed after every statement and the ledger insert succeeded (M006).
    ///
    /// Whether the schema change is durable depends on the engine's DDL
    /// transactionality; it is not resolved automatically.
    #[error("[M006] Failed to commit migration {file}: {source}. Schema changes may be partially applied; inspect the database and the ledger before re-running")]
    Commit {
        file: String,
        #[source]
        source: DbError,
    },

    /// An embedded schema version failed to apply (M007).
    #[error("[M007] Auto-sync of schema version v{version:03} failed: {source}")]
    AutoSync {
        version: i32,
        #[source]
        source: DbError,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    pub(crate) fn ledger(operation: impl Into<String>, source: DbError) -> Self {
        MigrateError::Ledger {
            operation: operation.into(),
            source,
        }
    }
}
