//! Ledger store: the durable record of applied migrations.
//!
//! The ledger table is created with explicit DDL so its column types and the
//! unique constraint on `name` hold no matter how the rest of the schema is
//! managed. That constraint is the last guard against double application.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tally_core::sql_utils::{escape_sql_string, is_plain_identifier, quote_ident};
use tally_core::MigrationName;
use tally_db::{Database, DbError, Transaction};

/// Default ledger table name
pub const DEFAULT_LEDGER_TABLE: &str = "migrations";

/// Timestamp layout used when binding `applied_at`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One row of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    /// Surrogate key assigned by the store
    pub id: i64,
    /// Migration file name
    pub name: String,
    /// Commit time of the migration's transaction (UTC)
    pub applied_at: DateTime<Utc>,
}

/// Owns the ledger table: creation, reads, and inserts.
pub struct LedgerStore<'db> {
    db: &'db dyn Database,
    table: String,
}

impl<'db> LedgerStore<'db> {
    /// Ledger store using the default `migrations` table
    pub fn new(db: &'db dyn Database) -> Self {
        Self {
            db,
            table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }

    /// Ledger store using a custom table name
    pub fn with_table(db: &'db dyn Database, table: &str) -> MigrateResult<Self> {
        if !is_plain_identifier(table) {
            return Err(MigrateError::InvalidLedgerTable(table.to_string()));
        }
        Ok(Self {
            db,
            table: table.to_string(),
        })
    }

    /// The database this ledger lives in
    pub fn database(&self) -> &'db dyn Database {
        self.db
    }

    /// The ledger table name
    pub fn table(&self) -> &str {
        &self.table
    }

    fn sequence(&self) -> String {
        format!("{}_id_seq", self.table)
    }

    /// Create the ledger table if it does not exist. Safe on every startup.
    pub fn ensure_table(&self) -> MigrateResult<()> {
        let sequence = self.sequence();
        let sql = format!(
            "CREATE SEQUENCE IF NOT EXISTS {seq_ident} START 1;
             CREATE TABLE IF NOT EXISTS {table} (
                 id         BIGINT PRIMARY KEY DEFAULT nextval('{seq_literal}'),
                 name       VARCHAR NOT NULL UNIQUE,
                 applied_at TIMESTAMP NOT NULL
             );",
            seq_ident = quote_ident(&sequence),
            seq_literal = escape_sql_string(&sequence),
            table = quote_ident(&self.table),
        );
        self.db
            .execute_batch(&sql)
            .map_err(|e| MigrateError::ledger("table creation", e))
    }

    /// Whether the ledger table exists yet
    pub fn exists(&self) -> MigrateResult<bool> {
        self.db
            .relation_exists(&self.table)
            .map_err(|e| MigrateError::ledger("lookup", e))
    }

    /// Names of every applied migration
    pub fn applied_names(&self) -> MigrateResult<HashSet<String>> {
        let sql = format!("SELECT name FROM {}", quote_ident(&self.table));
        let rows = self
            .db
            .query_rows(&sql)
            .map_err(|e| MigrateError::ledger("read", e))?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .collect())
    }

    /// Every ledger row, ordered by name
    pub fn applied_records(&self) -> MigrateResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT id, name, strftime(applied_at, '%Y-%m-%d %H:%M:%S.%f') FROM {} ORDER BY name",
            quote_ident(&self.table)
        );
        let rows = self
            .db
            .query_rows(&sql)
            .map_err(|e| MigrateError::ledger("read", e))?;

        rows.into_iter().map(parse_record).collect()
    }

    /// Insert a record for `name` inside the caller's transaction.
    ///
    /// Must run in the same transaction as the statements it certifies.
    pub fn record_applied(
        &self,
        tx: &mut dyn Transaction,
        name: &MigrationName,
        applied_at: DateTime<Utc>,
    ) -> MigrateResult<()> {
        let sql = format!(
            "INSERT INTO {} (name, applied_at) VALUES (?, CAST(? AS TIMESTAMP))",
            quote_ident(&self.table)
        );
        let applied_at = applied_at.format(TIMESTAMP_FORMAT).to_string();
        tx.execute_with_params(&sql, &[name.as_str(), applied_at.as_str()])
            .map_err(|e| MigrateError::ledger(format!("insert for {name}"), e))?;
        Ok(())
    }
}

fn parse_record(row: Vec<String>) -> MigrateResult<MigrationRecord> {
    let malformed = |what: &str| {
        MigrateError::ledger(
            "read",
            DbError::ExecutionError(format!("malformed ledger row ({what}): {row:?}")),
        )
    };

    let [id, name, applied_at] = row.as_slice() else {
        return Err(malformed("column count"));
    };
    let id = id.parse::<i64>().map_err(|_| malformed("id"))?;
    let applied_at = NaiveDateTime::parse_from_str(applied_at, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|_| malformed("applied_at"))?
        .and_utc();

    Ok(MigrationRecord {
        id,
        name: name.clone(),
        applied_at,
    })
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
