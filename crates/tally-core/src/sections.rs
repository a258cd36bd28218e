//! `-- Up` / `-- Down` section extraction.
//!
//! Purely textual: the markers are found by exact, case-sensitive substring
//! search, so they must not appear inside the payload's own string literals
//! or comments. A substring match also means any comment that merely starts
//! with a marker counts: `-- Update users` opens the forward section right
//! after `-- Up`, and `-- Downgrade` ends it.

/// Marker opening the forward section
pub const UP_MARKER: &str = "-- Up";

/// Marker opening the reverse section
pub const DOWN_MARKER: &str = "-- Down";

/// Extract the forward section of a migration file.
///
/// - no `-- Up`: the whole content (files predating the convention)
/// - `-- Up` without a later `-- Down`: everything after `-- Up`
/// - both: the text strictly between them
///
/// The result is trimmed. Markers are matched as substrings, so a line such
/// as `-- Update ...` is taken as the `-- Up` marker.
pub fn extract_up(raw: &str) -> &str {
    let Some(up) = raw.find(UP_MARKER) else {
        return raw.trim();
    };
    let body = &raw[up + UP_MARKER.len()..];
    match body.find(DOWN_MARKER) {
        Some(down) => body[..down].trim(),
        None => body.trim(),
    }
}

/// Extract the reverse section, if the file declares one.
///
/// Only a `-- Down` that follows `-- Up` counts. The reverse section is never
/// executed by the engine.
pub fn extract_down(raw: &str) -> Option<&str> {
    let up = raw.find(UP_MARKER)?;
    let body = &raw[up + UP_MARKER.len()..];
    let down = body.find(DOWN_MARKER)?;
    Some(body[down + DOWN_MARKER.len()..].trim())
}

#[cfg(test)]
#[path = "sections_test.rs"]
mod tests;
