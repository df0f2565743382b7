//! Integration tests for executing `sql/*.sql` against the scratch database.
//!
//! Every matching file is attempted; failures are collected per file and
//! reported together, so one broken script never hides another.

use std::{fs, path::Path};
use rusqlite::Connection;
use tempfile::TempDir;

use fixture_check::{
    config::Config,
    db::{run_scripts, ScriptError},
    Harness,
};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn open(dir: &TempDir) -> Harness {
    Harness::open(dir.path(), Config::default()).expect("open harness")
}

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |r| r.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

#[test]
fn every_script_runs() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sql/a.sql", "CREATE TABLE marker_a (x);");
    write(dir.path(), "sql/b.sql", "CREATE TABLE marker_b (x); SELECT 1;");
    let h = open(&dir);

    let run = h.run_sql_scripts().expect("scripts");

    assert_eq!(run.executed.len(), 2);
    assert!(table_exists(h.connection(), "marker_a"));
    assert!(table_exists(h.connection(), "marker_b"));
}

#[test]
fn statements_in_one_file_run_in_sequence() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "sql/seq.sql",
        "CREATE TABLE seq (n);\nINSERT INTO seq VALUES (1);\nINSERT INTO seq VALUES (2);\nUPDATE seq SET n = n * 10;\n",
    );
    let h = open(&dir);

    h.run_sql_scripts().unwrap();

    let total: i64 = h.connection().query_row("SELECT SUM(n) FROM seq", [], |r| r.get(0)).unwrap();
    assert_eq!(total, 30);
}

#[test]
fn syntax_error_is_reported_once_and_later_scripts_still_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sql/a_ok.sql", "CREATE TABLE marker_a (x);");
    write(dir.path(), "sql/b_bad.sql", "SELEC broken FROM nowhere;");
    write(dir.path(), "sql/c_ok.sql", "CREATE TABLE marker_c (x);");
    let h = open(&dir);

    let err = h.run_sql_scripts().unwrap_err();

    let message = err.to_string();
    match err {
        ScriptError::Failed { executed, failures } => {
            assert_eq!(failures.len(), 1, "{failures:?}");
            assert!(failures[0].path.ends_with("sql/b_bad.sql"), "{:?}", failures[0].path);
            assert!(!failures[0].message.is_empty());
            assert_eq!(executed.len(), 2);
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(message.starts_with("SQL execution failed for "), "{message}");
    assert!(message.contains("b_bad.sql"), "{message}");
    assert!(table_exists(h.connection(), "marker_c"));
}

#[test]
fn runtime_errors_are_reported_per_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sql/missing_table.sql", "SELECT * FROM does_not_exist;");
    write(dir.path(), "sql/missing_column.sql", "CREATE TABLE t (a); SELECT b FROM t;");
    let h = open(&dir);

    match h.run_sql_scripts().unwrap_err() {
        ScriptError::Failed { executed, failures } => {
            assert!(executed.is_empty());
            assert_eq!(failures.len(), 2);
            assert!(failures.iter().any(|f| f.message.contains("does_not_exist")));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn subdirectories_are_not_searched() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sql/top.sql", "SELECT 1;");
    write(dir.path(), "sql/nested/deep.sql", "THIS IS NOT SQL;");
    write(dir.path(), "sql/notes.txt", "THIS IS NOT SQL EITHER;");
    let h = open(&dir);

    let run = h.run_sql_scripts().expect("nested script must be skipped");

    assert_eq!(run.executed.len(), 1);
    assert!(run.executed[0].ends_with("sql/top.sql"));
}

#[test]
fn no_scripts_is_a_pass() {
    let dir = tempfile::tempdir().unwrap();
    let h = open(&dir);

    let run = h.run_sql_scripts().unwrap();

    assert!(run.executed.is_empty());
}

#[test]
fn invalid_pattern_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let conn = Connection::open_in_memory().unwrap();

    let err = run_scripts(&conn, dir.path(), "sql/[").unwrap_err();

    assert!(matches!(err, ScriptError::Pattern { ref pattern, .. } if pattern == "sql/["), "{err:?}");
}

#[test]
fn scripts_see_loaded_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "data/customers.csv", "customer_id,name\n1,Alice\n");
    write(dir.path(), "data/transactions.csv", "id,customer_id,amount\n10,1,5\n11,1,7\n");
    write(
        dir.path(),
        "sql/totals.sql",
        "CREATE TABLE totals AS SELECT customer_id, SUM(amount) AS total FROM transactions GROUP BY customer_id;",
    );
    let mut h = open(&dir);

    h.load_data().unwrap();
    h.run_sql_scripts().unwrap();

    let total: i64 = h
        .connection()
        .query_row("SELECT total FROM totals WHERE customer_id = 1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(total, 12);
}
