use foodorder_core::rules::validate_orders;
use foodorder_import::{read_orders_csv, ImportError};
use std::fs;
use tempfile::TempDir;

#[test]
fn reads_export_from_disk() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("orders.csv");
    fs::write(
        &path,
        "Timestamp,Email Address,meal\n2020-01-01,a@x.com,[Fafa] Salad\n2020-01-01,b@x.com,[Fafa] Wrap\n",
    )
    .expect("write csv");

    let parsed = read_orders_csv(&path).expect("read");
    assert_eq!(parsed.orders.len(), 2);
    assert_eq!(parsed.skipped_empty, 0);
    assert!(validate_orders(&parsed.orders).is_ok());
}

#[test]
fn missing_file_reports_its_path() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("nope.csv");

    match read_orders_csv(&path) {
        Err(ImportError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn read_errors_are_not_invalid_input() {
    let temp = TempDir::new().expect("tempdir");
    let err = read_orders_csv(&temp.path().join("nope.csv")).unwrap_err();
    assert!(!err.is_invalid_input());
    assert!(err.to_string().contains("nope.csv"));
}
