//! Scaffold generator for new migration files.
//!
//! Produces `<YYYYmmddHHMMSS>_<name>.sql`, the naming convention discovery
//! relies on for ordering.

use crate::error::{CoreError, CoreResult};
use crate::migration_name::MIGRATION_SUFFIX;
use crate::sections::{DOWN_MARKER, UP_MARKER};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Write a new migration template into `dir`, stamped with the current UTC time.
pub fn create_migration(dir: &Path, name: &str) -> CoreResult<PathBuf> {
    create_migration_at(dir, name, Utc::now())
}

/// Write a new migration template into `dir`, stamped with `now`.
///
/// Creates `dir` if needed and never overwrites an existing file.
pub fn create_migration_at(dir: &Path, name: &str, now: DateTime<Utc>) -> CoreResult<PathBuf> {
    validate_name(name)?;

    fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let file_name = format!("{}_{}{}", now.format("%Y%m%d%H%M%S"), name, MIGRATION_SUFFIX);
    let path = dir.join(file_name);

    let content = render_template(name, now);
    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(CoreError::ScaffoldExists {
                path: path.display().to_string(),
            })
        }
        Err(e) => {
            return Err(CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })
        }
    };
    std::io::Write::write_all(&mut file, content.as_bytes()).map_err(|e| {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    log::debug!("Wrote migration template {}", path.display());
    Ok(path)
}

/// Reject names that could escape `dir` or break the file name convention.
fn validate_name(name: &str) -> CoreResult<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.contains('/') || name.contains('\\') || name.contains("..") {
        Some("must not contain '/', '\\', or '..'")
    } else if name.starts_with('.') || name.starts_with('-') {
        Some("must not start with '.' or '-'")
    } else if name.chars().any(char::is_whitespace) {
        Some("must not contain whitespace (use '_' instead)")
    } else if name.ends_with(MIGRATION_SUFFIX) {
        Some("must not include the .sql suffix")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CoreError::InvalidScaffoldName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn render_template(name: &str, now: DateTime<Utc>) -> String {
    format!(
        "-- Migration: {name}\n\
         -- Created at: {created}\n\
         {UP_MARKER}\n\
         \n\
         -- Write your up migration here\n\
         \n\
         {DOWN_MARKER}\n\
         -- Kept for reference; tally never executes this section\n\
         \n\
         -- Write your down migration here\n",
        created = now.to_rfc3339(),
    )
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
