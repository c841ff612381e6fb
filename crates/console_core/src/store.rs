//! Latest fetched snapshot of one record kind, plus the fetch generation that produced it.

use std::collections::HashSet;

use shared::{
    domain::{Record, RecordId},
    protocol::CollectionResponse,
};
use tracing::warn;

/// Monotonic tag attached to every issued fetch.
pub type FetchGeneration = u64;

#[derive(Debug, Default)]
pub struct RecordStore {
    snapshot: Vec<Record>,
    issued: FetchGeneration,
    applied: FetchGeneration,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[Record] {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.snapshot.iter().find(|record| &record.id == id)
    }

    pub fn issue_generation(&mut self) -> FetchGeneration {
        self.issued += 1;
        self.issued
    }

    pub fn latest_issued(&self) -> FetchGeneration {
        self.issued
    }

    /// Replaces the snapshot wholesale unless a newer fetch already landed.
    /// Returns whether the snapshot changed hands.
    pub fn replace(&mut self, generation: FetchGeneration, records: Vec<Record>) -> bool {
        if generation <= self.applied {
            return false;
        }
        self.applied = generation;
        self.snapshot = records;
        true
    }

    /// Writes a committed status into the entry for `id`, wherever it sits in
    /// the snapshot. Returns false when the record is no longer present.
    pub fn apply_status(&mut self, id: &RecordId, status: &str) -> bool {
        match self.snapshot.iter_mut().find(|record| &record.id == id) {
            Some(record) => {
                record.set_status(status);
                true
            }
            None => false,
        }
    }
}

/// The one place where wire shapes become records: unwraps either response
/// shape, drops entries that are not keyed objects, and keeps the first
/// occurrence of a repeated identity.
pub fn normalize(response: CollectionResponse) -> Vec<Record> {
    let items = response.into_items();
    let mut seen = HashSet::with_capacity(items.len());
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match Record::from_value(item) {
            Ok(record) => {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                } else {
                    warn!(index, id = %record.id, "dropping record with duplicate identity");
                }
            }
            Err(err) => warn!(index, error = %err, "dropping unusable record"),
        }
    }
    records
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
