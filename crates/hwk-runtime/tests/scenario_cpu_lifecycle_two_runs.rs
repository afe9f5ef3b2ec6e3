//! Two-run lifecycle of a single CPU: installed in run 1, gone in run 2.
//! The unit must migrate from the used pool to the unused pool with its
//! prior-owner tag stripped, and the emptied used key must disappear.

use hwk_runtime::process_batch;
use hwk_schemas::Ledger;
use hwk_testkit::{cpu, SnapshotBuilder};

#[test]
fn scenario_cpu_removed_in_second_run_becomes_a_spare() {
    // Run 1: empty ledger, M1 reports one CPU.
    let run1 = SnapshotBuilder::new("M1").cpus(vec![cpu("X")]).build();
    let outcome = process_batch(Ledger::empty(), vec![run1]).unwrap();
    let ledger = outcome.ledger;

    assert!(ledger.machines.contains_key("M1"));
    let used_cpus = &ledger.pool.used["CPUs"];
    assert_eq!(used_cpus.len(), 1);
    assert_eq!(used_cpus[0].str_field("Version"), Some("X"));
    assert_eq!(used_cpus[0].owner(), Some("M1"));
    assert!(!ledger.pool.unused.contains_key("CPUs"));

    // Run 2: M1 reports no CPU at all.
    let run2 = SnapshotBuilder::new("M1").cpus(vec![]).build();
    let outcome = process_batch(ledger, vec![run2]).unwrap();
    let ledger = outcome.ledger;

    assert!(
        !ledger.pool.used.contains_key("CPUs"),
        "emptied used key must be dropped"
    );
    let unused_cpus = &ledger.pool.unused["CPUs"];
    assert_eq!(unused_cpus.len(), 1);
    assert_eq!(unused_cpus[0].str_field("Version"), Some("X"));
    assert_eq!(
        unused_cpus[0].owner(),
        None,
        "prior-owner tag is stripped once no used entry contradicts it"
    );

    // The machine entry itself is replaced, never deleted.
    assert!(ledger.machines.contains_key("M1"));
}
