//! hwk-reconcile
//!
//! Snapshot reconciliation engine.
//!
//! Architectural decisions:
//! - Identity, not equality: two records are "the same unit" when their
//!   category's identity-key fields agree, nothing else is compared
//! - First match wins; old-list order is significant and preserved
//! - A missing identity-key field is a malformed upstream record and aborts
//!   the whole run (a partially reconciled ledger is not a safe state)
//! - Removed components carry a prior-owner tag so the cross-run reuse pass
//!   can purge stale used entries
//!
//! Deterministic, pure logic. No IO. The ledger is always an explicit value
//! passed in and returned, never ambient state.

mod differ;
mod engine;
mod matcher;
mod merge;
mod types;

pub use differ::{diff_lists, CategoryDiff};
pub use engine::reconcile;
pub use matcher::{identity_key, matches, IdentityKey};
pub use merge::merge_batch;
pub use types::{MachineDiff, ReconcileError};
