use predicates::str::contains;

mod common;
use common::{init_with_refs, rti_on, save_reference_day, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("admin_init");

    rti_on(&db_path)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_db_info_and_check() {
    let db_path = init_with_refs("admin_db_info");
    save_reference_day(&db_path);

    rti_on(&db_path)
        .args(["db", "--info"])
        .assert()
        .success()
        .stdout(contains("Allocations"));

    rti_on(&db_path)
        .args(["db", "--check"])
        .assert()
        .success();
}

#[test]
fn test_log_records_saves() {
    let db_path = init_with_refs("admin_log");
    save_reference_day(&db_path);

    rti_on(&db_path)
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("save"));
}
