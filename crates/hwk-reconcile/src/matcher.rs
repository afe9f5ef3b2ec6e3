//! Identity matching for component records.
//!
//! Decides whether two records of the same category describe the same
//! physical unit. This is the only place that knows which fields identify a
//! unit; everything above it compares records through [`matches`] alone.

use hwk_schemas::{Category, ComponentRecord};
use serde_json::Value;

use crate::types::ReconcileError;

/// How a category recognizes "the same physical unit" across two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKey {
    /// A single field must agree.
    Field(&'static str),
    /// Every listed field must agree.
    AllOf(&'static [&'static str]),
    /// The key field depends on the record's own `"Type"` value; the two
    /// records may resolve different fields (an HDD and an NVMe drive name
    /// their serial differently).
    ByType(&'static [(&'static str, &'static str)]),
}

/// Discriminator field for type-dependent categories.
const TYPE_FIELD: &str = "Type";

/// Disk `"Type"` value → identity-key field. Static dispatch table instead
/// of branching on field names at runtime.
const DISK_KEYS: &[(&str, &str)] = &[("HDD", "Serial Number"), ("NVME", "SN")];

const RAM_KEYS: &[&str] = &["Serial Number", "Part Number"];

/// Identity key for `category`. Total over the closed [`Category`] enum, so
/// an unknown category can never reach the matcher.
pub fn identity_key(category: Category) -> IdentityKey {
    match category {
        Category::Motherboard => IdentityKey::Field("Serial Number"),
        Category::Cpus => IdentityKey::Field("Version"),
        Category::Ram => IdentityKey::AllOf(RAM_KEYS),
        Category::Gpus => IdentityKey::Field("UUID"),
        Category::Disks => IdentityKey::ByType(DISK_KEYS),
        Category::Monitors => IdentityKey::Field("Serial Number"),
    }
}

/// True when `a` and `b` describe the same physical unit of `category`.
///
/// Pure predicate. Fails when a record lacks a required key field; that is
/// a malformed upstream record and must propagate, not be swallowed.
pub fn matches(
    category: Category,
    a: &ComponentRecord,
    b: &ComponentRecord,
) -> Result<bool, ReconcileError> {
    match identity_key(category) {
        IdentityKey::Field(field) => {
            Ok(key_value(category, a, field)? == key_value(category, b, field)?)
        }
        IdentityKey::AllOf(fields) => {
            for field in fields {
                if key_value(category, a, field)? != key_value(category, b, field)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        IdentityKey::ByType(table) => {
            // Each record resolves its own key field per its own Type.
            let (type_a, field_a) = type_key_field(category, a, table)?;
            let (type_b, field_b) = type_key_field(category, b, table)?;
            // A unit never changes type: an HDD serial and an NVMe serial
            // are different namespaces even when the strings coincide.
            if type_a != type_b {
                return Ok(false);
            }
            Ok(key_value(category, a, field_a)? == key_value(category, b, field_b)?)
        }
    }
}

fn key_value<'a>(
    category: Category,
    record: &'a ComponentRecord,
    field: &'static str,
) -> Result<&'a Value, ReconcileError> {
    record
        .field(field)
        .ok_or(ReconcileError::MissingKeyField { category, field })
}

fn type_key_field(
    category: Category,
    record: &ComponentRecord,
    table: &'static [(&'static str, &'static str)],
) -> Result<(&'static str, &'static str), ReconcileError> {
    let type_value = key_value(category, record, TYPE_FIELD)?
        .as_str()
        .unwrap_or_default();
    table
        .iter()
        .find(|(t, _)| *t == type_value)
        .copied()
        .ok_or_else(|| ReconcileError::UnknownDiskType {
            type_value: type_value.to_string(),
        })
}
