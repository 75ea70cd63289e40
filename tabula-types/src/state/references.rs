use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Build the key of a one-to-many relation:
/// `"{owner}_{reference}@{target}_{owner_id}"`, e.g. `posts_comments@post_id_1`.
pub fn relation_key(owner: &str, reference: &str, target: &str, owner_id: &RecordId) -> String {
    format!("{}_{}@{}_{}", owner, reference, target, owner_id)
}

/// Cross-resource foreign-key index.
///
/// `one_to_many` is filled by GET_MANY_REFERENCE results, `possible_values`
/// by GET_MATCHING results. Entries are replaced in place, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceIndex {
    one_to_many: HashMap<String, Vec<RecordId>>,
    possible_values: HashMap<String, Vec<RecordId>>,
}

impl ReferenceIndex {
    pub fn related(&self, key: &str) -> Option<&[RecordId]> {
        self.one_to_many.get(key).map(Vec::as_slice)
    }

    pub fn possible_values(&self, key: &str) -> Option<&[RecordId]> {
        self.possible_values.get(key).map(Vec::as_slice)
    }

    pub fn set_related(&mut self, key: impl Into<String>, ids: Vec<RecordId>) {
        self.one_to_many.insert(key.into(), dedup(ids));
    }

    pub fn set_possible_values(&mut self, key: impl Into<String>, ids: Vec<RecordId>) {
        self.possible_values.insert(key.into(), dedup(ids));
    }
}

/// Set semantics, first occurrence keeps its position.
fn dedup(ids: Vec<RecordId>) -> Vec<RecordId> {
    let mut out: Vec<RecordId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_key_format() {
        let key = relation_key("posts", "comments", "post_id", &RecordId::Int(1));
        assert_eq!(key, "posts_comments@post_id_1");
    }

    #[test]
    fn set_related_supersedes_in_place() {
        let mut index = ReferenceIndex::default();
        index.set_related("k", vec![RecordId::Int(1), RecordId::Int(2), RecordId::Int(1)]);
        assert_eq!(index.related("k"), Some(&[RecordId::Int(1), RecordId::Int(2)][..]));
        index.set_related("k", vec![RecordId::Int(3)]);
        assert_eq!(index.related("k"), Some(&[RecordId::Int(3)][..]));
        assert_eq!(index.related("other"), None);
    }
}
