//! tally-core - Core library for Tally
//!
//! This crate provides configuration parsing, migration file discovery, the
//! `-- Up` / `-- Down` section parser, statement splitting, and the scaffold
//! generator. Nothing here touches a database.

pub mod config;
pub mod discovery;
pub mod error;
pub mod migration_name;
pub mod scaffold;
pub mod sections;
pub mod splitter;
pub mod sql_utils;

pub use config::{Config, DatabaseConfig, SchemaStrategy};
pub use discovery::{list_migrations, load_migration, MigrationFile, NamePolicy};
pub use error::{CoreError, CoreResult};
pub use migration_name::MigrationName;
pub use scaffold::{create_migration, create_migration_at};
pub use sections::{extract_down, extract_up};
pub use splitter::split_statements;
