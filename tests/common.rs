#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const USER: &str = "alice";

pub fn rti() -> Command {
    cargo_bin_cmd!("rtimesplit")
}

/// `rtimesplit --test --db <db> --user alice <args...>`
pub fn rti_on(db_path: &str) -> Command {
    rti_as(db_path, USER)
}

/// `rtimesplit --test --db <db> --user <user> <args...>`
pub fn rti_as(db_path: &str, user: &str) -> Command {
    let mut cmd = rti();
    cmd.args(["--test", "--db", db_path, "--user", user]);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimesplit.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Insert projects p1 (open), p2 (open), p3 (closed) with one stage and task under p1.
pub fn seed_reference_data(db_path: &str) {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    rtimesplit::db::initialize::init_db(&conn).expect("init db");
    conn.execute_batch(
        "INSERT INTO projects (id, name, status) VALUES
            ('p1', 'Apollo', 'open'),
            ('p2', 'Gemini', 'open'),
            ('p3', 'Mercury', 'closed');
         INSERT INTO stages (id, name, project_id) VALUES ('s1', 'Design', 'p1');
         INSERT INTO tasks (id, name, stage_id) VALUES ('t1', 'Mockups', 's1');",
    )
    .expect("seed reference data");
}

/// Initialize a DB through the CLI and seed the reference tables.
pub fn init_with_refs(name: &str) -> String {
    let db_path = setup_test_db(name);
    rti_on(&db_path).arg("init").assert().success();
    seed_reference_data(&db_path);
    db_path
}

/// Save 2025-09-01 for alice: 8h target, p1/s1 for 2h and p2 for half the day.
pub fn save_reference_day(db_path: &str) {
    rti_on(db_path)
        .args([
            "edit",
            "2025-09-01",
            "--target",
            "8h",
            "--entry",
            "p1/s1=2h",
            "--entry",
            "p2=50%",
            "--save",
        ])
        .assert()
        .success();
}
