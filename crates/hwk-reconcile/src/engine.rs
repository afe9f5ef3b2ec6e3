//! Whole-snapshot reconciliation for one machine.

use hwk_schemas::{Category, MachineSnapshot};

use crate::differ::diff_lists;
use crate::types::{MachineDiff, ReconcileError};

/// Reconcile a machine's newest snapshot against its stored one.
///
/// Runs the category differencer once per tracked category and collects
/// additions into `used` and leftovers into `unused`, both tagged with
/// `machine_id`. A machine never seen before (`old_snapshot == None`)
/// produces a `used` entry for every reported component and no `unused`
/// entries.
///
/// The caller is responsible for replacing the ledger's stored snapshot
/// for `machine_id` with `new_snapshot` in full afterwards.
pub fn reconcile(
    machine_id: &str,
    new_snapshot: &MachineSnapshot,
    old_snapshot: Option<&MachineSnapshot>,
) -> Result<MachineDiff, ReconcileError> {
    let mut diff = MachineDiff::empty(machine_id);

    for category in Category::ALL {
        let new_list = new_snapshot.components(category);
        let old_list = old_snapshot
            .map(|snap| snap.components(category))
            .unwrap_or_default();

        let cat_diff = diff_lists(category, machine_id, &old_list, &new_list)?;
        if !cat_diff.additions.is_empty() {
            diff.used
                .insert(category.name().to_string(), cat_diff.additions);
        }
        if !cat_diff.removals.is_empty() {
            diff.unused
                .insert(category.name().to_string(), cat_diff.removals);
        }
    }

    Ok(diff)
}
