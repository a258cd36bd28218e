//! Shared helpers for reading DuckDB row columns as strings.

use crate::error::DbResult;

/// Read a column value as a String, trying multiple DuckDB types.
///
/// DuckDB integer columns return `None` for `Option<String>`, so we try
/// String -> i64 -> f64 -> bool -> "null".
pub(crate) fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    "null".to_string()
}

/// Execute a prepared statement and collect all rows as strings.
///
/// DuckDB panics on `stmt.column_count()` before execution, so the column
/// count is read from each row instead.
pub(crate) fn collect_rows(stmt: &mut duckdb::Statement) -> DbResult<Vec<Vec<String>>> {
    let rows = stmt
        .query_map([], |row| {
            let col_count = row.as_ref().column_count();
            Ok((0..col_count)
                .map(|i| get_column_as_string(row, i))
                .collect())
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
