use super::*;
use crate::test_support::CommitFailingDb;
use tally_db::{Database, DbError, DuckDbBackend};

fn name(s: &str) -> MigrationName {
    MigrationName::parse(s).unwrap()
}

fn stmts(sql: &[&str]) -> Vec<String> {
    sql.iter().map(|s| s.to_string()).collect()
}

#[test]
fn applies_statements_and_records_file() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = LedgerStore::new(&db);
    ledger.ensure_table().unwrap();

    apply_migration(
        &ledger,
        &name("20230101000000_users.sql"),
        &stmts(&[
            "CREATE TABLE users (id INTEGER, email VARCHAR)",
            "INSERT INTO users VALUES (1, 'a@example.com')",
        ]),
    )
    .unwrap();

    assert!(db.relation_exists("users").unwrap());
    let rows = db.query_rows("SELECT count(*) FROM users").unwrap();
    assert_eq!(rows[0][0], "1");

    let records = ledger.applied_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "20230101000000_users.sql");
}

#[test]
fn failing_statement_rolls_back_everything() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = LedgerStore::new(&db);
    ledger.ensure_table().unwrap();

    let err = apply_migration(
        &ledger,
        &name("20230101000000_broken.sql"),
        &stmts(&["CREATE TABLE t (id INTEGER)", "INSERT INTO missing VALUES (1)"]),
    )
    .unwrap_err();

    match err {
        MigrateError::Apply {
            file,
            index,
            statement,
            ..
        } => {
            assert_eq!(file, "20230101000000_broken.sql");
            assert_eq!(index, 2);
            assert_eq!(statement, "INSERT INTO missing VALUES (1)");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(!db.relation_exists("t").unwrap());
    assert!(ledger.applied_names().unwrap().is_empty());
}

#[test]
fn apply_error_message_names_file_and_statement() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = LedgerStore::new(&db);
    ledger.ensure_table().unwrap();

    let err = apply_migration(
        &ledger,
        &name("20230101000000_broken.sql"),
        &stmts(&["SELEC 1"]),
    )
    .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("[M005]"), "{message}");
    assert!(message.contains("20230101000000_broken.sql"), "{message}");
    assert!(message.contains("statement 1"), "{message}");
    assert!(message.contains("SELEC 1"), "{message}");
}

#[test]
fn failed_commit_is_commit_error_without_ledger_row() {
    let db = CommitFailingDb::new(0);
    let ledger = LedgerStore::new(&db);
    ledger.ensure_table().unwrap();

    let err = apply_migration(
        &ledger,
        &name("20230101000000_t.sql"),
        &stmts(&["CREATE TABLE t (id INTEGER)"]),
    )
    .unwrap_err();

    match &err {
        MigrateError::Commit { file, source } => {
            assert_eq!(file, "20230101000000_t.sql");
            assert!(matches!(source, DbError::TransactionError(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("inspect the database"));
    assert!(ledger.applied_names().unwrap().is_empty());
}

#[test]
fn already_recorded_name_is_ledger_error_and_rolls_back() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = LedgerStore::new(&db);
    ledger.ensure_table().unwrap();

    let file = name("20230101000000_t.sql");
    apply_migration(&ledger, &file, &stmts(&["CREATE TABLE t (id INTEGER)"])).unwrap();

    let err = apply_migration(&ledger, &file, &stmts(&["CREATE TABLE other (id INTEGER)"]))
        .unwrap_err();

    assert!(matches!(err, MigrateError::Ledger { .. }), "{err}");
    assert!(!db.relation_exists("other").unwrap());
    assert_eq!(ledger.applied_records().unwrap().len(), 1);
}

#[test]
fn empty_file_is_still_recorded() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = LedgerStore::new(&db);
    ledger.ensure_table().unwrap();

    apply_migration(&ledger, &name("20230101000000_noop.sql"), &[]).unwrap();

    let names = ledger.applied_names().unwrap();
    assert!(names.contains("20230101000000_noop.sql"));
}
