use hwk_schemas::{Ledger, Pool};
use hwk_testkit::{cpu, gpu, SnapshotBuilder};

#[test]
fn scenario_saved_ledger_loads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("data.json");

    let mut ledger = Ledger::empty();
    let snap = SnapshotBuilder::new("M1")
        .cpus(vec![cpu("X")])
        .gpus(vec![gpu("g1")])
        .build();
    ledger.machines.insert("M1".to_string(), snap);
    ledger.pool = Pool {
        used: [(
            "GPUs".to_string(),
            vec![gpu("g1").tagged_with_owner("M1")],
        )]
        .into_iter()
        .collect(),
        unused: Default::default(),
    };

    hwk_ledger::save(&path, &ledger).unwrap();
    let loaded = hwk_ledger::load(&path).unwrap();
    assert_eq!(loaded, ledger);

    // Only the ledger file itself ends up in the directory: the temp file
    // must have been renamed away.
    let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("data.json")]);
}

#[test]
fn scenario_save_replaces_previous_state_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");

    let mut first = Ledger::empty();
    first
        .machines
        .insert("M1".to_string(), SnapshotBuilder::new("M1").build());
    hwk_ledger::save(&path, &first).unwrap();

    let second = Ledger::empty();
    hwk_ledger::save(&path, &second).unwrap();

    assert_eq!(hwk_ledger::load(&path).unwrap(), second);
}
