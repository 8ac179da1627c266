// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute tables paired index-for-index with layer shapes.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A scalar attribute value.
pub type Value = serde_json::Value;

/// One attribute record. Field order is insertion order.
pub type Record = serde_json::Map<String, Value>;

/// An ordered sequence of attribute records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    records: Vec<Record>,
}

impl DataTable {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Creates a table of `n` empty records.
    pub fn with_len(n: usize) -> Self {
        Self {
            records: vec![Record::new(); n],
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, i: usize) -> Option<&Record> {
        self.records.get(i)
    }

    /// Field names in order of first appearance across all records.
    pub fn fields(&self) -> Vec<String> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut fields = Vec::new();
        for record in &self.records {
            for key in record.keys() {
                if seen.insert(key.as_str()) {
                    fields.push(key.clone());
                }
            }
        }
        fields
    }

    pub fn field_exists(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.contains_key(name))
    }
}

/// Builds a [`Record`] from a `serde_json::json!` object literal.
///
/// Non-object values produce an empty record.
pub fn record_from_json(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}
