//! Test doubles for exercising failure paths the real backend rarely hits.

use std::sync::atomic::{AtomicUsize, Ordering};
use tally_db::{Database, DbError, DbResult, DuckDbBackend, Transaction};

/// DuckDB backend whose transactions roll back instead of committing.
///
/// Commits succeed for the first `healthy_commits` transactions; every later
/// COMMIT is refused after the statements and the ledger insert ran.
pub(crate) struct CommitFailingDb {
    inner: DuckDbBackend,
    healthy_commits: usize,
    begun: AtomicUsize,
}

impl CommitFailingDb {
    pub(crate) fn new(healthy_commits: usize) -> Self {
        Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            healthy_commits,
            begun: AtomicUsize::new(0),
        }
    }
}

impl Database for CommitFailingDb {
    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql)
    }

    fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>> {
        self.inner.query_rows(sql)
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner.relation_exists(name)
    }

    fn begin(&self) -> DbResult<Box<dyn Transaction + '_>> {
        let attempt = self.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RefusingTransaction {
            inner: self.inner.begin()?,
            refuse: attempt >= self.healthy_commits,
        }))
    }

    fn db_type(&self) -> &'static str {
        "duckdb-commit-failing"
    }
}

struct RefusingTransaction<'a> {
    inner: Box<dyn Transaction + 'a>,
    refuse: bool,
}

impl Transaction for RefusingTransaction<'_> {
    fn execute(&mut self, sql: &str) -> DbResult<()> {
        self.inner.execute(sql)
    }

    fn execute_with_params(&mut self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.inner.execute_with_params(sql, params)
    }

    fn commit(self: Box<Self>) -> DbResult<()> {
        let this = *self;
        if this.refuse {
            this.inner.rollback()?;
            return Err(DbError::TransactionError(
                "COMMIT failed: simulated I/O error".to_string(),
            ));
        }
        this.inner.commit()
    }

    fn rollback(self: Box<Self>) -> DbResult<()> {
        self.inner.rollback()
    }
}
