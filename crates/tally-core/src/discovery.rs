//! Migration file discovery.
//!
//! Lists a migrations directory (non-recursively), keeps the `.sql` files and
//! returns their names in byte-wise lexicographic order.

use crate::error::{CoreError, CoreResult};
use crate::migration_name::{MigrationName, MIGRATION_SUFFIX};
use std::fs;
use std::path::Path;

/// How discovery treats `.sql` files that break the naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Abort discovery on the first non-conforming name
    #[default]
    Strict,
    /// Keep non-conforming files and log a warning
    Lenient,
}

impl NamePolicy {
    /// Policy matching the `strict_names` config flag
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            NamePolicy::Strict
        } else {
            NamePolicy::Lenient
        }
    }
}

/// A migration file read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Base file name, also the ledger key
    pub name: MigrationName,
    /// Full file content
    pub raw_content: String,
}

/// List the migration files in `dir`, ordered for application.
///
/// Subdirectories and entries without the `.sql` suffix are ignored. A `.sql`
/// entry whose name is not UTF-8 cannot be a ledger key: strict discovery
/// rejects it, lenient discovery skips it with a warning.
pub fn list_migrations(dir: &Path, policy: NamePolicy) -> CoreResult<Vec<MigrationName>> {
    let discovery_err = |source: std::io::Error| CoreError::DiscoveryFailed {
        path: dir.display().to_string(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(discovery_err)? {
        let entry = entry.map_err(discovery_err)?;
        if entry.file_type().map_err(discovery_err)?.is_dir() {
            continue;
        }

        let os_name = entry.file_name();
        if !os_name
            .as_encoded_bytes()
            .ends_with(MIGRATION_SUFFIX.as_bytes())
        {
            continue;
        }
        let Some(file_name) = os_name.to_str() else {
            let name = os_name.to_string_lossy().into_owned();
            match policy {
                NamePolicy::Strict => {
                    return Err(CoreError::InvalidMigrationName {
                        name,
                        reason: "file name is not valid UTF-8".to_string(),
                    })
                }
                NamePolicy::Lenient => {
                    log::warn!("Skipping non UTF-8 migration file in {}: {name}", dir.display());
                    continue;
                }
            }
        };

        let name = match (MigrationName::parse(file_name), policy) {
            (Ok(name), _) => name,
            (Err(e), NamePolicy::Strict) => return Err(e),
            (Err(e), NamePolicy::Lenient) => {
                log::warn!("{e}; ordering for this file may not be chronological");
                MigrationName::unchecked(file_name)
            }
        };
        names.push(name);
    }

    names.sort();
    Ok(names)
}

/// Read one migration file from `dir`.
pub fn load_migration(dir: &Path, name: &MigrationName) -> CoreResult<MigrationFile> {
    let raw_content =
        fs::read_to_string(dir.join(name.as_str())).map_err(|e| CoreError::MigrationUnreadable {
            name: name.to_string(),
            source: e,
        })?;
    Ok(MigrationFile {
        name: name.clone(),
        raw_content,
    })
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
