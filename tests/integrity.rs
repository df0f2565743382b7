//! Integration tests for the "no negative amounts" rule.

use std::{fs, path::Path};
use tempfile::TempDir;

use fixture_check::{config::Config, db::IntegrityError, Harness};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project whose transactions fixture holds `transactions`, loaded.
fn loaded(transactions: &str) -> (TempDir, Harness) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "data/customers.csv", "customer_id,name\n1,Alice\n");
    write(dir.path(), "data/transactions.csv", transactions);
    let mut h = Harness::open(dir.path(), Config::default()).unwrap();
    h.load_data().expect("load");
    (dir, h)
}

#[test]
fn negative_amount_is_counted() {
    let (_dir, h) = loaded("id,name,amount\n1,Alice,-5\n");

    let err = h.check_no_negative_amounts().unwrap_err();

    assert!(matches!(err, IntegrityError::NegativeAmounts(1)), "{err:?}");
    assert_eq!(err.to_string(), "1 transactions have negative amounts!");
}

#[test]
fn every_negative_row_is_counted() {
    let (_dir, h) = loaded("id,amount\n1,10\n2,-0.01\n3,-250\n4,0\n");

    let err = h.check_no_negative_amounts().unwrap_err();

    assert!(matches!(err, IntegrityError::NegativeAmounts(2)), "{err:?}");
}

#[test]
fn zero_and_positive_amounts_pass() {
    let (_dir, h) = loaded("id,amount\n1,0\n2,12.5\n3,900\n");

    h.check_no_negative_amounts().expect("no negatives");
}

#[test]
fn missing_transactions_table_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let h = Harness::open(dir.path(), Config::default()).unwrap();

    let err = h.check_no_negative_amounts().unwrap_err();

    assert!(matches!(err, IntegrityError::Sql(_)), "{err:?}");
}
