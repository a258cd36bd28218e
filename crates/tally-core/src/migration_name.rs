//! Strongly-typed migration file name wrapper.
//!
//! A migration name is the file's base name (`20230101000000_init.sql`) and
//! doubles as the ledger key. The fixed-width timestamp prefix is what makes
//! plain lexicographic ordering equal to the intended application order.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// File suffix shared by every migration
pub const MIGRATION_SUFFIX: &str = ".sql";

/// Width of the zero-padded `YYYYmmddHHMMSS` prefix
pub const TIMESTAMP_WIDTH: usize = 14;

/// Base name of a migration file.
///
/// Ordering is byte-wise on the full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MigrationName(String);

impl MigrationName {
    /// Parse a file name, requiring `<14 digits>_<description>.sql`.
    pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        match convention_violation(&name) {
            None => Ok(Self(name)),
            Some(reason) => Err(CoreError::InvalidMigrationName {
                name,
                reason: reason.to_string(),
            }),
        }
    }

    /// Wrap a name without checking the timestamp convention.
    ///
    /// Used for lenient discovery and for names read back from the ledger.
    pub fn unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name follows the `<timestamp>_<description>.sql` convention
    pub fn is_conventional(&self) -> bool {
        convention_violation(&self.0).is_none()
    }

    /// The description between the timestamp and the suffix, if conventional
    pub fn description(&self) -> Option<&str> {
        self.is_conventional()
            .then(|| &self.0[TIMESTAMP_WIDTH + 1..self.0.len() - MIGRATION_SUFFIX.len()])
    }
}

/// Returns why `name` breaks the naming convention, or `None` when it conforms.
fn convention_violation(name: &str) -> Option<&'static str> {
    let Some(stem) = name.strip_suffix(MIGRATION_SUFFIX) else {
        return Some("must end in .sql");
    };
    let bytes = stem.as_bytes();
    if bytes.len() < TIMESTAMP_WIDTH
        || !bytes[..TIMESTAMP_WIDTH].iter().all(u8::is_ascii_digit)
    {
        return Some("must start with a 14-digit timestamp (YYYYmmddHHMMSS)");
    }
    if bytes.get(TIMESTAMP_WIDTH) != Some(&b'_') {
        return Some("timestamp must be followed by '_'");
    }
    if bytes.len() == TIMESTAMP_WIDTH + 1 {
        return Some("missing description after the timestamp");
    }
    None
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MigrationName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "migration_name_test.rs"]
mod tests;
