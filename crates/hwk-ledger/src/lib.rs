//! hwk-ledger
//!
//! Load/save lifecycle of the ledger file. This is the only crate that
//! touches storage; everything above it works on in-memory values.
//!
//! - absent file → empty ledger (first run is not an error)
//! - present but malformed → fatal, no auto-repair
//! - save serializes the full ledger to a sibling temp file and renames it
//!   into place, so readers never observe a partial write
//!
//! Concurrent runs against the same file are not supported; callers must
//! serialize runs externally (single-writer deployment or a file lock).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use hwk_schemas::Ledger;

/// Read the ledger from `path`, or return an empty one when the file does
/// not exist yet.
pub fn load(path: impl AsRef<Path>) -> Result<Ledger> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Ledger::empty());
    }

    let raw = fs::read_to_string(path).with_context(|| format!("read ledger {:?}", path))?;
    let ledger: Ledger = serde_json::from_str(&raw)
        .with_context(|| format!("ledger {:?} is semantically malformed", path))?;
    Ok(ledger)
}

/// Write the full ledger to `path`, replacing the previous state wholesale.
pub fn save(path: impl AsRef<Path>, ledger: &Ledger) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create_dir_all {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(ledger).context("serialize ledger failed")?;

    // Temp file beside the target so the rename stays on one filesystem.
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ledger".into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, json).with_context(|| format!("write ledger temp {:?}", tmp_path))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("rename {:?} -> {:?}", tmp_path, path))?;
    Ok(())
}
