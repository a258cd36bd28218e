use super::*;
use crate::error::MigrateError;
use crate::status::MigrationState;
use crate::test_support::CommitFailingDb;
use std::fs;
use tally_core::CoreError;
use tally_db::{Database, DuckDbBackend};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

fn column_names(db: &DuckDbBackend, table: &str) -> Vec<String> {
    db.query_rows(&format!(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_name = '{table}' ORDER BY ordinal_position"
    ))
    .unwrap()
    .into_iter()
    .map(|row| row[0].clone())
    .collect()
}

fn init_and_add_col(dir: &TempDir) {
    write(dir, "20230101000000_init.sql", "CREATE TABLE foo (id INT);");
    write(
        dir,
        "20230102000000_add_col.sql",
        "ALTER TABLE foo ADD COLUMN bar INT;",
    );
}

#[test]
fn applies_directory_in_order() {
    let dir = TempDir::new().unwrap();
    init_and_add_col(&dir);
    let db = DuckDbBackend::in_memory().unwrap();
    let migrator = Migrator::new(LedgerStore::new(&db));

    let summary = migrator.apply_all(dir.path()).unwrap();

    assert_eq!(
        summary.applied,
        vec!["20230101000000_init.sql", "20230102000000_add_col.sql"]
    );
    assert!(summary.skipped.is_empty());

    let records = migrator.ledger().applied_records().unwrap();
    let recorded: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        recorded,
        vec!["20230101000000_init.sql", "20230102000000_add_col.sql"]
    );
    assert_eq!(column_names(&db, "foo"), vec!["id", "bar"]);
}

#[test]
fn rerun_applies_nothing() {
    let dir = TempDir::new().unwrap();
    init_and_add_col(&dir);
    let db = DuckDbBackend::in_memory().unwrap();
    let migrator = Migrator::new(LedgerStore::new(&db));

    migrator.apply_all(dir.path()).unwrap();
    let second = migrator.apply_all(dir.path()).unwrap();

    assert!(second.applied.is_empty());
    assert_eq!(second.skipped.len(), 2);
    assert_eq!(migrator.ledger().applied_records().unwrap().len(), 2);
}

#[test]
fn file_order_wins_over_creation_order() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "20230102000000_second.sql",
        "INSERT INTO seq VALUES (2);",
    );
    write(&dir, "20230101000000_first.sql", "CREATE TABLE seq (n INT);");
    let db = DuckDbBackend::in_memory().unwrap();

    Migrator::new(LedgerStore::new(&db))
        .apply_all(dir.path())
        .unwrap();

    let rows = db.query_rows("SELECT n FROM seq").unwrap();
    assert_eq!(rows, vec![vec!["2".to_string()]]);
}

#[test]
fn bad_file_reports_statement_and_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    init_and_add_col(&dir);
    let db = DuckDbBackend::in_memory().unwrap();
    let migrator = Migrator::new(LedgerStore::new(&db));
    migrator.apply_all(dir.path()).unwrap();

    write(
        &dir,
        "20230103000000_bad.sql",
        "CREATE TABLE baz (id INT); INVALID SQL;",
    );
    let err = migrator.apply_all(dir.path()).unwrap_err();

    match err {
        MigrateError::Apply { file, index, .. } => {
            assert_eq!(file, "20230103000000_bad.sql");
            assert_eq!(index, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!migrator
        .ledger()
        .applied_names()
        .unwrap()
        .contains("20230103000000_bad.sql"));
    assert!(!db.relation_exists("baz").unwrap());
}

#[test]
fn fails_fast_and_keeps_earlier_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230101000000_a.sql", "CREATE TABLE a (id INT);");
    write(&dir, "20230102000000_b.sql", "CREATE TABLE b (id INT); NOPE;");
    write(&dir, "20230103000000_c.sql", "CREATE TABLE c (id INT);");
    let db = DuckDbBackend::in_memory().unwrap();
    let migrator = Migrator::new(LedgerStore::new(&db));

    let err = migrator.apply_all(dir.path()).unwrap_err();
    assert!(
        matches!(&err, MigrateError::Apply { file, .. } if file == "20230102000000_b.sql"),
        "{err}"
    );

    let names = migrator.ledger().applied_names().unwrap();
    assert_eq!(names.len(), 1);
    assert!(names.contains("20230101000000_a.sql"));
    assert!(db.relation_exists("a").unwrap());
    assert!(!db.relation_exists("b").unwrap());
    assert!(!db.relation_exists("c").unwrap());
}

#[test]
fn runs_only_the_up_section() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "20230101000000_init.sql",
        "-- Migration: init\n-- Up\nCREATE TABLE up_only (id INT);\n-- Down\nDROP TABLE up_only;\n",
    );
    let db = DuckDbBackend::in_memory().unwrap();

    Migrator::new(LedgerStore::new(&db))
        .apply_all(dir.path())
        .unwrap();

    assert!(db.relation_exists("up_only").unwrap());
}

#[test]
fn markerless_file_applies_in_full() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230104000000_qux.sql", "CREATE TABLE qux (id INT);");
    let db = DuckDbBackend::in_memory().unwrap();

    let summary = Migrator::new(LedgerStore::new(&db))
        .apply_all(dir.path())
        .unwrap();

    assert_eq!(summary.applied, vec!["20230104000000_qux.sql"]);
    assert!(db.relation_exists("qux").unwrap());
}

#[test]
fn unedited_scaffold_is_recorded_without_statements() {
    let dir = TempDir::new().unwrap();
    let path = tally_core::create_migration(dir.path(), "placeholder").unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let migrator = Migrator::new(LedgerStore::new(&db));

    let summary = migrator.apply_all(dir.path()).unwrap();

    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert_eq!(summary.applied, vec![file_name]);
    assert!(migrator.ledger().applied_names().unwrap().contains(file_name));
}

#[test]
fn missing_directory_is_discovery_error_before_any_apply() {
    let dir = TempDir::new().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();

    let err = Migrator::new(LedgerStore::new(&db))
        .apply_all(&dir.path().join("nope"))
        .unwrap_err();

    assert!(matches!(
        err,
        MigrateError::Discovery(CoreError::DiscoveryFailed { .. })
    ));
}

#[test]
fn strict_policy_rejects_bad_names() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230101000000_a.sql", "CREATE TABLE a (id INT);");
    write(&dir, "init.sql", "CREATE TABLE legacy (id INT);");
    let db = DuckDbBackend::in_memory().unwrap();

    let err = Migrator::new(LedgerStore::new(&db))
        .apply_all(dir.path())
        .unwrap_err();

    assert!(matches!(
        err,
        MigrateError::Discovery(CoreError::InvalidMigrationName { .. })
    ));
    assert!(!db.relation_exists("a").unwrap());
}

#[test]
fn lenient_policy_keeps_bad_names_in_lexical_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230101000000_a.sql", "CREATE TABLE a (id INT);");
    write(&dir, "init.sql", "CREATE TABLE legacy (id INT);");
    let db = DuckDbBackend::in_memory().unwrap();

    let summary = Migrator::new(LedgerStore::new(&db))
        .with_name_policy(NamePolicy::Lenient)
        .apply_all(dir.path())
        .unwrap();

    assert_eq!(summary.applied, vec!["20230101000000_a.sql", "init.sql"]);
    assert!(db.relation_exists("legacy").unwrap());
}

#[test]
fn commit_failure_stops_the_run() {
    let dir = TempDir::new().unwrap();
    write(&dir, "20230101000000_a.sql", "CREATE TABLE a (id INT);");
    write(&dir, "20230102000000_b.sql", "CREATE TABLE b (id INT);");
    let db = CommitFailingDb::new(1);
    let migrator = Migrator::new(LedgerStore::new(&db));

    let err = migrator.apply_all(dir.path()).unwrap_err();

    assert!(
        matches!(&err, MigrateError::Commit { file, .. } if file == "20230102000000_b.sql"),
        "{err}"
    );
    let names = migrator.ledger().applied_names().unwrap();
    assert_eq!(names.len(), 1);
    assert!(names.contains("20230101000000_a.sql"));
}

#[test]
fn pending_and_status_do_not_create_ledger() {
    let dir = TempDir::new().unwrap();
    init_and_add_col(&dir);
    let db = DuckDbBackend::in_memory().unwrap();
    let migrator = Migrator::new(LedgerStore::new(&db));

    let pending = migrator.pending(dir.path()).unwrap();
    assert_eq!(pending.len(), 2);

    let status = migrator.status(dir.path()).unwrap();
    assert!(status.iter().all(|e| e.state == MigrationState::Pending));

    assert!(!migrator.ledger().exists().unwrap());
}

#[test]
fn status_reports_orphaned_rows() {
    let dir = TempDir::new().unwrap();
    init_and_add_col(&dir);
    let db = DuckDbBackend::in_memory().unwrap();
    let migrator = Migrator::new(LedgerStore::new(&db));
    migrator.apply_all(dir.path()).unwrap();

    fs::remove_file(dir.path().join("20230102000000_add_col.sql")).unwrap();
    write(&dir, "20230105000000_next.sql", "CREATE TABLE next (id INT);");

    let labels: Vec<(String, &str)> = migrator
        .status(dir.path())
        .unwrap()
        .into_iter()
        .map(|e| (e.name, e.state.label()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("20230101000000_init.sql".to_string(), "applied"),
            ("20230102000000_add_col.sql".to_string(), "orphaned"),
            ("20230105000000_next.sql".to_string(), "pending"),
        ]
    );
    assert_eq!(
        migrator.pending(dir.path()).unwrap(),
        vec!["20230105000000_next.sql"]
    );
}

#[test]
fn custom_ledger_table_is_used() {
    let dir = TempDir::new().unwrap();
    init_and_add_col(&dir);
    let db = DuckDbBackend::in_memory().unwrap();

    Migrator::new(LedgerStore::with_table(&db, "schema_migrations").unwrap())
        .apply_all(dir.path())
        .unwrap();

    assert!(db.relation_exists("schema_migrations").unwrap());
    assert!(!db.relation_exists("migrations").unwrap());
}

#[test]
fn status_flags_files_with_down_statements() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "20230101000000_init.sql",
        "-- Up\nCREATE TABLE foo (id INT);\n-- Down\nDROP TABLE foo;\n",
    );
    tally_core::create_migration(dir.path(), "placeholder").unwrap();
    let db = DuckDbBackend::in_memory().unwrap();

    let status = Migrator::new(LedgerStore::new(&db))
        .status(dir.path())
        .unwrap();

    assert_eq!(status.len(), 2);
    assert_eq!(status[0].name, "20230101000000_init.sql");
    assert!(status[0].has_down);
    assert!(!status[1].has_down);
}
