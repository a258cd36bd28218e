//! tally-db - Database abstraction layer for Tally
//!
//! This crate provides the blocking `Database` / `Transaction` traits used by
//! the migration engine and their DuckDB implementation.

pub mod duckdb;
pub mod error;
pub(crate) mod row_helpers;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Transaction};
