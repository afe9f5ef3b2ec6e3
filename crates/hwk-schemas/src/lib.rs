//! hwk-schemas
//!
//! Shared data model for the hardware ledger:
//! - `Category`: the tracked component categories and their snapshot keys
//! - `ComponentRecord`: one physical unit as reported by the dump parsers
//! - `MachineSnapshot`: one machine's full inventory at a point in time
//! - `Pool` / `Ledger`: the persisted state
//!
//! Data shapes only. No I/O, no reconciliation logic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field injected into pool entries to record machine linkage.
///
/// On `pool.used` entries it names the current owner. On `pool.unused`
/// entries it optionally names the prior owner (the machine the unit was
/// last seen in before removal); the merge engine strips it once the entry
/// has no contradicting `used` entry left.
pub const OWNER_FIELD: &str = "OwnerMachineId";

/// Primary-key field of a snapshot. Sourced from the motherboard serial by
/// the upstream parsers; [`MachineSnapshot::machine_id`] falls back to the
/// motherboard record when the field is absent.
pub const MACHINE_ID_FIELD: &str = "MachineId";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The tracked hardware categories.
///
/// Closed enum on purpose: an unknown category reaching the diff or merge
/// engines would be a programming error, so it is made unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Motherboard,
    Cpus,
    Ram,
    Gpus,
    Disks,
    Monitors,
}

impl Category {
    /// Every tracked category, in snapshot processing order.
    pub const ALL: [Category; 6] = [
        Category::Motherboard,
        Category::Cpus,
        Category::Ram,
        Category::Gpus,
        Category::Disks,
        Category::Monitors,
    ];

    /// Key under which the category appears in snapshots and pools.
    /// Disks live under `"HDDs"` for historical reasons (the dump format
    /// predates NVMe support).
    pub fn name(self) -> &'static str {
        match self {
            Category::Motherboard => "Motherboard",
            Category::Cpus => "CPUs",
            Category::Ram => "RAM",
            Category::Gpus => "GPUs",
            Category::Disks => "HDDs",
            Category::Monitors => "Monitors",
        }
    }

    /// Motherboard is a single record in snapshots; everything else is a list.
    pub fn is_scalar(self) -> bool {
        matches!(self, Category::Motherboard)
    }

    /// Reverse of [`Category::name`], for category keys read back from a
    /// persisted pool. `None` means the ledger carries a category this
    /// build does not know; callers treat that as fatal.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ComponentRecord
// ---------------------------------------------------------------------------

/// One component as produced by the upstream dump parsers.
///
/// Kept as a schema-flexible JSON map: the parsers own the per-category
/// field shapes and may add fields freely. Only the identity-key fields are
/// contractual (enforced by the matcher, not here).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRecord(pub Map<String, Value>);

impl ComponentRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Copy of this record with [`OWNER_FIELD`] set to `machine_id`.
    pub fn tagged_with_owner(&self, machine_id: &str) -> ComponentRecord {
        let mut rec = self.clone();
        rec.0
            .insert(OWNER_FIELD.to_string(), Value::String(machine_id.to_string()));
        rec
    }

    pub fn owner(&self) -> Option<&str> {
        self.str_field(OWNER_FIELD)
    }

    /// Remove the owner tag, if any.
    pub fn clear_owner(&mut self) {
        self.0.remove(OWNER_FIELD);
    }
}

impl From<Map<String, Value>> for ComponentRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ---------------------------------------------------------------------------
// MachineSnapshot
// ---------------------------------------------------------------------------

/// One machine's full hardware inventory at a point in time, as parsed.
///
/// Stored wholesale in the ledger and replaced wholesale on every new
/// snapshot for the same machine id; never partially patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineSnapshot(pub Map<String, Value>);

impl MachineSnapshot {
    /// Primary key of the snapshot: the [`MACHINE_ID_FIELD`] when present,
    /// else the motherboard serial (how the original dumps identified a
    /// machine before the field was introduced).
    pub fn machine_id(&self) -> Option<String> {
        if let Some(id) = self.0.get(MACHINE_ID_FIELD).and_then(Value::as_str) {
            return Some(id.to_string());
        }
        self.0
            .get(Category::Motherboard.name())
            .and_then(|mobo| mobo.get("Serial Number"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Component records reported for `category`, in snapshot order.
    ///
    /// Scalar categories yield zero or one record. RAM sticks are nested
    /// under `"RAM"/"Sticks"` in the dump format. An absent category key
    /// yields an empty list (the machine reports none of that category).
    pub fn components(&self, category: Category) -> Vec<ComponentRecord> {
        let value = match category {
            Category::Ram => self
                .0
                .get(category.name())
                .and_then(|ram| ram.get("Sticks")),
            _ => self.0.get(category.name()),
        };

        match value {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(Value::as_object)
                .cloned()
                .map(ComponentRecord)
                .collect(),
            Some(Value::Object(record)) if category.is_scalar() => {
                vec![ComponentRecord(record.clone())]
            }
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pool / Ledger
// ---------------------------------------------------------------------------

/// Pool entries keyed by category name. Kept sparse: a category with no
/// entries has no key at all (invariant restored on every merge).
pub type PoolEntries = BTreeMap<String, Vec<ComponentRecord>>;

/// Global used/unused hardware pools across all machines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub used: PoolEntries,
    pub unused: PoolEntries,
}

impl Pool {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The persisted state: latest snapshot per machine ever seen, plus the
/// global pools. Serialized as a single JSON object with top-level keys
/// `"machines"` and `"pool"`; no versioning field.
///
/// Both fields are mandatory when deserializing: a ledger file missing
/// either key is semantically malformed and must fail loading, not be
/// auto-repaired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub machines: BTreeMap<String, MachineSnapshot>,
    pub pool: Pool,
}

impl Ledger {
    /// The state assumed when no ledger file exists yet.
    pub fn empty() -> Self {
        Self::default()
    }
}
