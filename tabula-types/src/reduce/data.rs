use crate::{CrudAction, CrudIntent, CrudKind, ProviderResponse, ResourceState};

/// Pre-flight writes. UPDATE puts the client draft into the pool right away
/// so any open view shows the value being saved, whatever the mutation mode.
pub(super) fn reduce_intent(request: &CrudAction, slice: &mut ResourceState) {
    match &request.intent {
        CrudIntent::Update { id, data, .. } => slice.data.merge_draft(id, data),
        CrudIntent::GetList { .. }
        | CrudIntent::GetOne { .. }
        | CrudIntent::GetMany { .. }
        | CrudIntent::GetMatching { .. }
        | CrudIntent::GetManyReference { .. }
        | CrudIntent::Create { .. }
        | CrudIntent::Delete { .. } => {}
    }
}

/// Merge fetched records into the pool, last write wins.
pub(super) fn reduce_success(request: &CrudAction, response: &ProviderResponse, slice: &mut ResourceState) {
    match request.kind() {
        CrudKind::GetList
        | CrudKind::GetMany
        | CrudKind::GetMatching
        | CrudKind::GetManyReference => slice.data.insert_all(response.records()),
        CrudKind::GetOne | CrudKind::Update | CrudKind::Create => {
            if let Some(record) = response.record() {
                slice.data.insert(record.clone());
            }
        }
        // Deletes prune the list window only.
        CrudKind::Delete => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Record, RecordId, ResourceConfig};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_json(value).unwrap()
    }

    #[test]
    fn update_intent_writes_draft_immediately() {
        let mut slice = ResourceState::new(ResourceConfig::new("posts"));
        slice.data.insert(record(json!({"id": 1, "title": "old", "views": 3})));
        let request = CrudAction::update("posts", 1, record(json!({"title": "new"})), None, None);
        reduce_intent(&request, &mut slice);
        assert_eq!(
            slice.data.get(&RecordId::Int(1)).cloned().map(Record::into_json),
            Some(json!({"id": 1, "title": "new", "views": 3}))
        );
    }

    #[test]
    fn create_success_stores_returned_record() {
        let mut slice = ResourceState::new(ResourceConfig::new("posts"));
        let request = CrudAction::create("posts", record(json!({"title": "A"})), Some("/posts"));
        let response = ProviderResponse::one(record(json!({"id": 5, "title": "A"})));
        reduce_success(&request, &response, &mut slice);
        assert_eq!(
            slice.data.get(&RecordId::Int(5)).cloned().map(Record::into_json),
            Some(json!({"id": 5, "title": "A"}))
        );
    }

    #[test]
    fn success_overwrites_whole_record() {
        let mut slice = ResourceState::new(ResourceConfig::new("posts"));
        slice.data.insert(record(json!({"id": 1, "title": "old", "draft_only": true})));
        let request = CrudAction::get_one("posts", 1, None);
        reduce_success(&request, &ProviderResponse::one(record(json!({"id": 1, "title": "server"}))), &mut slice);
        assert_eq!(
            slice.data.get(&RecordId::Int(1)).cloned().map(Record::into_json),
            Some(json!({"id": 1, "title": "server"}))
        );
    }

    #[test]
    fn custom_identifier_keys_the_pool() {
        let mut slice = ResourceState::new(ResourceConfig::new("users").with_identifier("_id"));
        let request = CrudAction::get_many("users", vec![RecordId::from("a1")]);
        reduce_success(&request, &ProviderResponse::many(vec![record(json!({"_id": "a1"}))]), &mut slice);
        assert!(slice.data.contains(&RecordId::from("a1")));
    }
}
