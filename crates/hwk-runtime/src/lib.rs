//! hwk-runtime
//!
//! Batch orchestration over the pure reconciliation engine: one run takes
//! the loaded ledger plus a finite list of input snapshots, reconciles each
//! machine sequentially, merges the accumulated deltas into the pools, and
//! reports ledger machines that did not show up in the batch.
//!
//! Single-threaded by design. All failure modes abort the whole run: a
//! partially applied batch is not a safe ledger state. Storage is never
//! touched here; the caller owns load and save.

use std::collections::BTreeSet;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use hwk_reconcile::{merge_batch, reconcile, MachineDiff};
use hwk_schemas::{Ledger, MachineSnapshot};

/// Observability summary of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at_utc: DateTime<Utc>,
    /// Machine ids processed, in input order.
    pub machines_processed: Vec<String>,
    /// Subset of processed machines never seen by the ledger before.
    pub new_machines: Vec<String>,
    /// Ledger machines that sent no snapshot this run. Possibly stale, but
    /// never deleted.
    pub missing_machines: Vec<String>,
}

/// Updated ledger plus the run report.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub ledger: Ledger,
    pub report: RunReport,
}

/// Process one batch of snapshots against the ledger.
///
/// Machine identities are resolved and checked for duplicates up front, so
/// an ambiguous batch aborts before any state changes. Each snapshot then
/// replaces the machine's stored one wholesale, and the collected diffs go
/// through the pool merge in one pass.
pub fn process_batch(mut ledger: Ledger, snapshots: Vec<MachineSnapshot>) -> Result<BatchOutcome> {
    let run_id = Uuid::new_v4();
    let started_at_utc = Utc::now();

    let mut machine_ids = Vec::with_capacity(snapshots.len());
    let mut seen = BTreeSet::new();
    for (idx, snap) in snapshots.iter().enumerate() {
        let id = snap.machine_id().ok_or_else(|| {
            anyhow!(
                "snapshot #{idx} has no machine identity \
                 (no MachineId field and no motherboard serial)"
            )
        })?;
        if !seen.insert(id.clone()) {
            bail!("machine id '{id}' appears more than once in the input batch");
        }
        machine_ids.push(id);
    }

    let missing_machines: Vec<String> = ledger
        .machines
        .keys()
        .filter(|id| !seen.contains(*id))
        .cloned()
        .collect();

    let mut diffs: Vec<MachineDiff> = Vec::with_capacity(snapshots.len());
    let mut new_machines = Vec::new();

    for (machine_id, snapshot) in machine_ids.iter().zip(snapshots) {
        let stored = ledger.machines.get(machine_id);
        let is_new = stored.is_none();

        let diff = reconcile(machine_id, &snapshot, stored)?;
        info!(
            "reconciled machine {}: newly_used={} newly_unused={}{}",
            machine_id,
            diff.used_count(),
            diff.unused_count(),
            if is_new { " (new machine)" } else { "" }
        );

        if is_new {
            new_machines.push(machine_id.clone());
        }
        ledger.machines.insert(machine_id.clone(), snapshot);
        diffs.push(diff);
    }

    ledger.pool = merge_batch(&ledger.pool, &diffs)?;

    for machine_id in &missing_machines {
        warn!("machine {} sent no snapshot this run (possibly stale)", machine_id);
    }

    Ok(BatchOutcome {
        ledger,
        report: RunReport {
            run_id,
            started_at_utc,
            machines_processed: machine_ids,
            new_machines,
            missing_machines,
        },
    })
}
