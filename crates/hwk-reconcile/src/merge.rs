//! Batch merge of per-machine diffs into the global pools.
//!
//! Two reuse passes keep the unused pool honest:
//! - pass 1 (intra-batch): a unit scrapped from one machine and installed
//!   in another within the same run is not a spare
//! - pass 2 (cross-run): a unit whose unused entry lingers from an earlier
//!   run still has a stale used entry under its prior owner; the stale used
//!   entry is purged and the prior-owner tag stripped
//!
//! Without pass 2 the unused pool grows unboundedly with ghost entries.
//! Step order is load-bearing: later passes depend on earlier accumulation.

use hwk_schemas::{Category, ComponentRecord, Pool, PoolEntries};

use crate::matcher::matches;
use crate::types::{MachineDiff, ReconcileError};

/// Merge every per-machine diff of one run into `pool`, returning the
/// updated pool. Pure value-in/value-out; persisting is the caller's job.
pub fn merge_batch(pool: &Pool, diffs: &[MachineDiff]) -> Result<Pool, ReconcileError> {
    // A persisted pool may carry category keys this build does not track;
    // fail before any accumulation rather than mid-merge.
    for name in pool.used.keys().chain(pool.unused.keys()) {
        category_for(name)?;
    }

    // 1. Accumulate the run's deltas into batch-local maps.
    let mut used = PoolEntries::new();
    let mut unused = PoolEntries::new();
    for diff in diffs {
        extend_entries(&mut used, &diff.used);
        extend_entries(&mut unused, &diff.unused);
    }

    // 2. Spares from prior runs, untouched by this run's machines.
    extend_entries(&mut unused, &pool.unused);

    // 3. Reuse pass 1: drop unused entries claimed used elsewhere this run.
    for (name, unused_list) in unused.iter_mut() {
        let category = category_for(name)?;
        let Some(used_list) = used.get(name) else {
            continue;
        };
        let mut kept = Vec::with_capacity(unused_list.len());
        for rec in unused_list.iter() {
            if !any_match(category, rec, used_list)? {
                kept.push(rec.clone());
            }
        }
        *unused_list = kept;
    }

    // 4. Components unaffected by this run retain their used status.
    extend_entries(&mut used, &pool.used);

    // 5. Keep the persisted shape sparse.
    drop_empty_categories(&mut used);
    drop_empty_categories(&mut unused);

    // 6. Reuse pass 2: purge stale used entries contradicting a tagged
    //    unused entry, and strip the tag once nothing contradicts it.
    for (name, unused_list) in unused.iter_mut() {
        let category = category_for(name)?;
        let Some(used_list) = used.get_mut(name) else {
            continue;
        };
        for rec in unused_list.iter_mut() {
            let Some(prior_owner) = rec.owner().map(str::to_string) else {
                continue;
            };
            let mut stale = None;
            for (idx, used_rec) in used_list.iter().enumerate() {
                if used_rec.owner() == Some(prior_owner.as_str())
                    && matches(category, used_rec, rec)?
                {
                    stale = Some(idx);
                    break;
                }
            }
            if let Some(idx) = stale {
                used_list.remove(idx);
                rec.clear_owner();
            }
        }
    }

    // Pass 2 can empty a used list; restore the sparse-shape invariant.
    drop_empty_categories(&mut used);

    Ok(Pool { used, unused })
}

fn extend_entries(into: &mut PoolEntries, from: &PoolEntries) {
    for (name, records) in from {
        into.entry(name.clone())
            .or_default()
            .extend(records.iter().cloned());
    }
}

fn category_for(name: &str) -> Result<Category, ReconcileError> {
    Category::from_name(name).ok_or_else(|| ReconcileError::UnknownCategory {
        name: name.to_string(),
    })
}

fn any_match(
    category: Category,
    rec: &ComponentRecord,
    list: &[ComponentRecord],
) -> Result<bool, ReconcileError> {
    for candidate in list {
        if matches(category, rec, candidate)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn drop_empty_categories(entries: &mut PoolEntries) {
    entries.retain(|_, records| !records.is_empty());
}
