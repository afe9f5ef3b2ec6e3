use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

use hwk_schemas::MachineSnapshot;
use hwk_testkit::{cpu, gpu, SnapshotBuilder};

fn write_snapshot(dir: &Path, name: &str, snap: &MachineSnapshot) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(snap).unwrap()).unwrap();
    path
}

fn hwk() -> Command {
    let mut cmd = Command::cargo_bin("hwk").unwrap();
    cmd.env_remove("HWK_LEDGER");
    cmd
}

#[test]
fn scenario_ingest_then_status_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("data.json");
    let snap = SnapshotBuilder::new("M1")
        .cpus(vec![cpu("X")])
        .gpus(vec![gpu("g1")])
        .build();
    let snap_file = write_snapshot(dir.path(), "m1.json", &snap);

    hwk()
        .arg("ingest")
        .arg("--ledger")
        .arg(&ledger)
        .arg(&snap_file)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("machines_processed=1")
                .and(predicate::str::contains("new_machine=M1"))
                .and(predicate::str::contains("ledger_saved=true")),
        );

    hwk()
        .arg("status")
        .arg("--ledger")
        .arg(&ledger)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("machines=1")
                .and(predicate::str::contains("machine=M1"))
                .and(predicate::str::contains("used[CPUs]=1"))
                .and(predicate::str::contains("used[GPUs]=1")),
        );
}

#[test]
fn scenario_ledger_path_falls_back_to_env_var() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("data.json");

    hwk()
        .env("HWK_LEDGER", &ledger)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("machines=0"));
}

#[test]
fn scenario_no_ledger_path_anywhere_fails() {
    hwk()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HWK_LEDGER"));
}

#[test]
fn scenario_malformed_snapshot_file_aborts_ingest() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("data.json");
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "not json").unwrap();

    hwk()
        .arg("ingest")
        .arg("--ledger")
        .arg(&ledger)
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.json"));

    assert!(!ledger.exists(), "a failed run must not create a ledger");
}
