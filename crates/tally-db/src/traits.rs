//! Database trait definitions

use crate::error::DbResult;

/// Database abstraction used by the migration engine.
///
/// All calls are blocking; the engine runs strictly sequentially.
pub trait Database: Send + Sync {
    /// Execute one or more SQL statements outside any explicit transaction
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return every row with each column rendered as a string
    fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>>;

    /// Check if a table or view exists (`schema.name` or `name` in `main`)
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Begin a transaction.
    ///
    /// The returned handle holds the connection until it is committed, rolled
    /// back, or dropped. Dropping it without committing rolls back.
    fn begin(&self) -> DbResult<Box<dyn Transaction + '_>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// An open transaction on a [`Database`].
pub trait Transaction {
    /// Execute a single statement inside the transaction
    fn execute(&mut self, sql: &str) -> DbResult<()>;

    /// Execute a single statement with positional string parameters,
    /// returning the number of affected rows
    fn execute_with_params(&mut self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Commit the transaction
    fn commit(self: Box<Self>) -> DbResult<()>;

    /// Roll back the transaction
    fn rollback(self: Box<Self>) -> DbResult<()>;
}
