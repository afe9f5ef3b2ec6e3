//! Per-category list diffing.
//!
//! Computes additions and removals between a machine's stored record list
//! and its newly reported one. Inputs are never mutated; matched old
//! records are tracked through a claimed-index marker so a unit can be
//! matched at most once.

use hwk_schemas::{Category, ComponentRecord};

use crate::matcher::matches;
use crate::types::ReconcileError;

/// Result of diffing one category.
///
/// `additions` carry the owning machine id; `removals` carry the prior
/// owner (the machine they were last seen in), which the merge engine's
/// cross-run reuse pass depends on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDiff {
    pub additions: Vec<ComponentRecord>,
    pub removals: Vec<ComponentRecord>,
}

/// Diff `old` against `new` for one category of one machine.
///
/// For every new record, the first unclaimed old record the matcher accepts
/// is claimed and produces no delta; a new record with no match becomes an
/// addition. Old records left unclaimed are removals. Old-list input order
/// is significant and preserved, no sorting.
///
/// Scalar categories arrive as zero-or-one element lists and fall out of
/// the same procedure: a matching pair yields no delta, a differing pair
/// yields one addition plus one removal.
///
/// An empty `old` (machine never seen, or no prior data for the category)
/// makes every new record an addition; an empty `new` makes every old
/// record a removal.
pub fn diff_lists(
    category: Category,
    machine_id: &str,
    old: &[ComponentRecord],
    new: &[ComponentRecord],
) -> Result<CategoryDiff, ReconcileError> {
    let mut claimed = vec![false; old.len()];
    let mut additions = Vec::new();

    for new_rec in new {
        let mut found = None;
        for (idx, old_rec) in old.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            if matches(category, new_rec, old_rec)? {
                found = Some(idx);
                break;
            }
        }
        match found {
            Some(idx) => claimed[idx] = true,
            None => additions.push(new_rec.tagged_with_owner(machine_id)),
        }
    }

    let removals = old
        .iter()
        .zip(&claimed)
        .filter(|(_, taken)| !**taken)
        .map(|(rec, _)| rec.tagged_with_owner(machine_id))
        .collect();

    Ok(CategoryDiff {
        additions,
        removals,
    })
}
