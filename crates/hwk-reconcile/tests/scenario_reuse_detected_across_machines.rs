//! A GPU leaves machine A and shows up in machine B within the same run.
//! It must end up used under B and must not be counted as scrap.

use hwk_reconcile::{merge_batch, reconcile};
use hwk_schemas::Pool;
use hwk_testkit::{gpu, SnapshotBuilder};

#[test]
fn scenario_gpu_moved_between_machines_in_one_run_is_not_scrap() {
    let a_old = SnapshotBuilder::new("A").gpus(vec![gpu("g1")]).build();
    let a_new = SnapshotBuilder::new("A").gpus(vec![]).build();
    let b_old = SnapshotBuilder::new("B").build(); // B previously had no GPU
    let b_new = SnapshotBuilder::new("B").gpus(vec![gpu("g1")]).build();

    let diff_a = reconcile("A", &a_new, Some(&a_old)).unwrap();
    let diff_b = reconcile("B", &b_new, Some(&b_old)).unwrap();

    assert_eq!(diff_a.unused["GPUs"].len(), 1);
    assert_eq!(diff_b.used["GPUs"].len(), 1);

    let merged = merge_batch(&Pool::empty(), &[diff_a, diff_b]).unwrap();

    let used = &merged.used["GPUs"];
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].str_field("UUID"), Some("g1"));
    assert_eq!(used[0].owner(), Some("B"));

    assert!(
        !merged.unused.contains_key("GPUs"),
        "reused GPU must not appear in the unused pool"
    );
}
