//! Baseline application schema shipped inside the binary.
//!
//! Each version is a numbered `.sql` file embedded via `include_str!`.
//! [`SCHEMA_VERSIONS`] is ordered by version and consumed by
//! [`crate::auto_sync::run_auto_sync`].

/// One embedded schema version.
pub struct SchemaVersion {
    /// Sequential version number (1-based)
    pub version: i32,
    /// Short label for logs
    pub description: &'static str,
    pub sql: &'static str,
}

/// All embedded versions, in order.
pub static SCHEMA_VERSIONS: &[SchemaVersion] = &[
    SchemaVersion {
        version: 1,
        description: "users",
        sql: include_str!("v001_users.sql"),
    },
    SchemaVersion {
        version: 2,
        description: "galleries",
        sql: include_str!("v002_galleries.sql"),
    },
];
