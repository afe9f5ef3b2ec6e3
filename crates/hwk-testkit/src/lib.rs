//! hwk-testkit
//!
//! Fixture builders for scenario tests: component records with just their
//! identity-key fields, and a snapshot builder that assembles the dump
//! shape (RAM sticks nested, scalar motherboard) without hand-written JSON
//! in every test.

use serde_json::{json, Map, Value};

use hwk_schemas::{Category, ComponentRecord, MachineSnapshot, MACHINE_ID_FIELD};

fn record(v: Value) -> ComponentRecord {
    match v {
        Value::Object(map) => ComponentRecord(map),
        _ => unreachable!("test fixtures are always JSON objects"),
    }
}

pub fn motherboard(serial: &str) -> ComponentRecord {
    record(json!({ "Serial Number": serial, "Manufacturer": "TestWorks" }))
}

pub fn cpu(version: &str) -> ComponentRecord {
    record(json!({ "Version": version }))
}

pub fn ram_stick(serial: &str, part: &str) -> ComponentRecord {
    record(json!({ "Serial Number": serial, "Part Number": part }))
}

pub fn gpu(uuid: &str) -> ComponentRecord {
    record(json!({ "UUID": uuid }))
}

pub fn hdd(serial: &str) -> ComponentRecord {
    record(json!({ "Type": "HDD", "Serial Number": serial }))
}

pub fn nvme(sn: &str) -> ComponentRecord {
    record(json!({ "Type": "NVME", "SN": sn }))
}

pub fn monitor(serial: &str) -> ComponentRecord {
    record(json!({ "Serial Number": serial }))
}

/// Builds a [`MachineSnapshot`] in the normalized dump shape.
///
/// The motherboard defaults to a record whose serial equals the machine id,
/// matching how the parsers derive the id; override with
/// [`SnapshotBuilder::motherboard`] when a test needs them to differ.
pub struct SnapshotBuilder {
    map: Map<String, Value>,
}

impl SnapshotBuilder {
    pub fn new(machine_id: &str) -> Self {
        let mut map = Map::new();
        map.insert(
            MACHINE_ID_FIELD.to_string(),
            Value::String(machine_id.to_string()),
        );
        map.insert(
            Category::Motherboard.name().to_string(),
            Value::Object(motherboard(machine_id).0),
        );
        Self { map }
    }

    pub fn motherboard(mut self, rec: ComponentRecord) -> Self {
        self.map
            .insert(Category::Motherboard.name().to_string(), Value::Object(rec.0));
        self
    }

    pub fn cpus(self, recs: Vec<ComponentRecord>) -> Self {
        self.list(Category::Cpus, recs)
    }

    /// RAM sticks are nested under `"RAM"/"Sticks"` in the dump format.
    pub fn ram(mut self, sticks: Vec<ComponentRecord>) -> Self {
        let sticks: Vec<Value> = sticks.into_iter().map(|r| Value::Object(r.0)).collect();
        self.map.insert(
            Category::Ram.name().to_string(),
            json!({ "Sticks": sticks }),
        );
        self
    }

    pub fn gpus(self, recs: Vec<ComponentRecord>) -> Self {
        self.list(Category::Gpus, recs)
    }

    pub fn disks(self, recs: Vec<ComponentRecord>) -> Self {
        self.list(Category::Disks, recs)
    }

    pub fn monitors(self, recs: Vec<ComponentRecord>) -> Self {
        self.list(Category::Monitors, recs)
    }

    pub fn build(self) -> MachineSnapshot {
        MachineSnapshot(self.map)
    }

    fn list(mut self, category: Category, recs: Vec<ComponentRecord>) -> Self {
        let values: Vec<Value> = recs.into_iter().map(|r| Value::Object(r.0)).collect();
        self.map
            .insert(category.name().to_string(), Value::Array(values));
        self
    }
}
