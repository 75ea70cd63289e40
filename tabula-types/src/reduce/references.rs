use crate::{CrudAction, CrudIntent, ProviderResponse, ReferenceIndex};

/// Index relation results under the request's relation key.
pub(super) fn reduce_success(
    request: &CrudAction,
    response: &ProviderResponse,
    identifier: &str,
    index: &mut ReferenceIndex,
) {
    match &request.intent {
        CrudIntent::GetManyReference { related_to, .. } => {
            index.set_related(related_to.clone(), response.ids(identifier));
        }
        CrudIntent::GetMatching { related_to, .. } => {
            index.set_possible_values(related_to.clone(), response.ids(identifier));
        }
        CrudIntent::GetList { .. }
        | CrudIntent::GetOne { .. }
        | CrudIntent::GetMany { .. }
        | CrudIntent::Create { .. }
        | CrudIntent::Update { .. }
        | CrudIntent::Delete { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{relation_key, Filter, Pagination, Record, RecordId, Sort};
    use serde_json::json;

    fn rows(ids: &[i64]) -> ProviderResponse {
        ProviderResponse::page(
            ids.iter().filter_map(|id| Record::from_json(json!({"id": id, "post_id": 1}))).collect(),
            ids.len() as u64,
        )
    }

    #[test]
    fn many_reference_results_are_indexed_by_relation() {
        let key = relation_key("posts", "comments", "post_id", &RecordId::Int(1));
        let request = CrudAction::get_many_reference(
            "comments",
            "post_id",
            1,
            key.clone(),
            Pagination::default(),
            Sort::default(),
            Filter::new(),
        );
        let mut index = ReferenceIndex::default();
        reduce_success(&request, &rows(&[10, 11]), "id", &mut index);
        assert_eq!(index.related(&key), Some(&[RecordId::Int(10), RecordId::Int(11)][..]));

        reduce_success(&request, &rows(&[12]), "id", &mut index);
        assert_eq!(index.related(&key), Some(&[RecordId::Int(12)][..]));
    }

    #[test]
    fn matching_results_fill_possible_values() {
        let request = CrudAction::get_matching("tags", "posts_tags", Pagination::default(), Sort::default(), Filter::new());
        let mut index = ReferenceIndex::default();
        reduce_success(&request, &rows(&[1, 2]), "id", &mut index);
        assert_eq!(index.possible_values("posts_tags"), Some(&[RecordId::Int(1), RecordId::Int(2)][..]));
        assert_eq!(index.related("posts_tags"), None);
    }
}
