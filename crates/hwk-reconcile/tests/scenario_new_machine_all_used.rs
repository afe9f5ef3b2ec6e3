use hwk_reconcile::reconcile;
use hwk_testkit::{cpu, gpu, ram_stick, SnapshotBuilder};

#[test]
fn scenario_never_seen_machine_reports_everything_as_used() {
    let snap = SnapshotBuilder::new("M-NEW")
        .cpus(vec![cpu("Ryzen 9 5950X")])
        .ram(vec![ram_stick("R1", "P1")])
        .gpus(vec![gpu("g1"), gpu("g2")])
        .build();

    let diff = reconcile("M-NEW", &snap, None).unwrap();

    assert!(diff.unused.is_empty(), "new machine produces no unused entries");
    // Motherboard + 1 CPU + 1 stick + 2 GPUs.
    assert_eq!(diff.used_count(), 5);
    assert_eq!(diff.used["GPUs"].len(), 2);
    for records in diff.used.values() {
        for rec in records {
            assert_eq!(rec.owner(), Some("M-NEW"));
        }
    }
}
