//! Error types for tally-core

use thiserror::Error;

/// Core error type for Tally
#[derive(Error, Debug)]
pub enum CoreError {
    /// T001: Configuration file not found
    #[error("[T001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// T002: Invalid configuration value
    #[error("[T002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// T003: Migrations directory could not be listed
    #[error("[T003] Failed to read migrations directory '{path}': {source}")]
    DiscoveryFailed {
        path: String,
        source: std::io::Error,
    },

    /// T004: Migration file could not be read
    #[error("[T004] Failed to read migration file {name}: {source}")]
    MigrationUnreadable {
        name: String,
        source: std::io::Error,
    },

    /// T005: A `.sql` file does not follow the `<timestamp>_<name>.sql` convention
    #[error("[T005] Invalid migration file name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// T006: Scaffold name rejected
    #[error("[T006] Invalid migration name '{name}': {reason}")]
    InvalidScaffoldName { name: String, reason: String },

    /// T007: Scaffold target already exists
    #[error("[T007] Migration file already exists: {path}")]
    ScaffoldExists { path: String },

    /// T008: IO error with file path context
    #[error("[T008] Failed to write '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// T009: Config YAML parse error
    #[error("[T009] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
