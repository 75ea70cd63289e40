use std::collections::HashMap;

use crate::{Record, RecordId};

/// Per-resource pool of records keyed by id. Last write wins; nothing is
/// ever evicted (deletes only prune the list window).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    identifier: String,
    records: HashMap<RecordId, Record>,
}

impl RecordStore {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), records: HashMap::new() }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Store a record under its own id, overwriting any previous value.
    /// Returns the id, or `None` when the record carries no id.
    pub fn insert(&mut self, record: Record) -> Option<RecordId> {
        let Some(id) = record.id(&self.identifier) else {
            log::warn!(target: "reduce::data", "dropping record without '{}' attribute", self.identifier);
            return None;
        };
        self.records.insert(id.clone(), record);
        Some(id)
    }

    pub fn insert_all<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) {
        for record in records {
            self.insert(record.clone());
        }
    }

    /// Write a client-side draft over the stored value (shallow union),
    /// creating the entry if it is not cached yet.
    pub fn merge_draft(&mut self, id: &RecordId, draft: &Record) {
        let identifier = self.identifier.clone();
        let entry = self
            .records
            .entry(id.clone())
            .or_insert_with(|| Record::new().with(identifier, id.to_value()));
        entry.merge(draft);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, &Record)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_json(value).unwrap()
    }

    #[test]
    fn insert_overwrites_by_id() {
        let mut store = RecordStore::new("id");
        store.insert(record(json!({"id": 1, "title": "a"})));
        store.insert(record(json!({"id": "1", "title": "b"})));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&RecordId::Int(1)).and_then(|r| r.get("title")), Some(&json!("b")));
    }

    #[test]
    fn records_without_id_are_dropped() {
        let mut store = RecordStore::new("_id");
        assert_eq!(store.insert(record(json!({"id": 1}))), None);
        assert!(store.is_empty());
    }

    #[test]
    fn draft_merges_over_existing_value() {
        let mut store = RecordStore::new("id");
        store.insert(record(json!({"id": 2, "title": "old", "views": 10})));
        store.merge_draft(&RecordId::Int(2), &record(json!({"title": "new"})));
        assert_eq!(
            store.get(&RecordId::Int(2)).cloned().map(Record::into_json),
            Some(json!({"id": 2, "title": "new", "views": 10}))
        );
    }

    #[test]
    fn draft_for_uncached_record_creates_it() {
        let mut store = RecordStore::new("id");
        store.merge_draft(&RecordId::Int(9), &record(json!({"title": "draft"})));
        assert_eq!(
            store.get(&RecordId::Int(9)).cloned().map(Record::into_json),
            Some(json!({"id": 9, "title": "draft"}))
        );
    }
}
