//! Statement splitting for migration forward sections.
//!
//! This is a naive lexical split on `;`. It does not understand quoted
//! literals, comments, or dialect-specific terminators, so migration files
//! must not carry an unescaped `;` inside a statement body (string literals,
//! procedure definitions). That is a constraint on the file format.

/// Split a forward section into executable statements.
///
/// Fragments are trimmed; fragments holding nothing but whitespace and
/// `--` line comments are dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|fragment| !is_blank(fragment))
        .map(str::to_string)
        .collect()
}

/// `true` when every line is empty or a `--` comment.
fn is_blank(fragment: &str) -> bool {
    fragment.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with("--")
    })
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
