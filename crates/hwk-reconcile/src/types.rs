use std::fmt;

use hwk_schemas::{Category, PoolEntries};

/// Errors produced during reconciliation.
///
/// All three variants are fatal to the run: the first indicates a malformed
/// upstream record, the other two indicate state this build cannot reason
/// about. None of them may be swallowed per-record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// A record lacks the identity-key field its category requires.
    MissingKeyField {
        category: Category,
        field: &'static str,
    },
    /// A disk record carries a `"Type"` value with no identity-key mapping.
    UnknownDiskType { type_value: String },
    /// A persisted pool carries a category key this build does not track.
    UnknownCategory { name: String },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::MissingKeyField { category, field } => {
                write!(
                    f,
                    "identity key field '{field}' missing from a {category} record \
                     (malformed upstream record)"
                )
            }
            ReconcileError::UnknownDiskType { type_value } => {
                write!(f, "disk record has unknown Type '{type_value}'")
            }
            ReconcileError::UnknownCategory { name } => {
                write!(f, "unknown hardware category '{name}' in pool")
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

/// Per-machine reconciliation result: components the machine newly reports
/// (`used`) and components it no longer reports (`unused`), keyed by
/// category name. Categories with no delta carry no key.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineDiff {
    pub machine_id: String,
    pub used: PoolEntries,
    pub unused: PoolEntries,
}

impl MachineDiff {
    pub fn empty(machine_id: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
            used: PoolEntries::new(),
            unused: PoolEntries::new(),
        }
    }

    /// True when the snapshot matched the stored one exactly.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty() && self.unused.is_empty()
    }

    pub fn used_count(&self) -> usize {
        self.used.values().map(Vec::len).sum()
    }

    pub fn unused_count(&self) -> usize {
        self.unused.values().map(Vec::len).sum()
    }
}
