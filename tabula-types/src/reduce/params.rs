use crate::{CrudAction, CrudKind, ListParamsOp, ProviderResponse, ReduceError, ResourceState};

pub(super) fn reduce_op(op: &ListParamsOp, slice: &mut ResourceState) -> Result<(), ReduceError> {
    let params = &mut slice.params;
    match op {
        ListParamsOp::NextPage => params.next_page(),
        ListParamsOp::PrevPage => params.prev_page(),
        ListParamsOp::GotoPage(page) => params.goto_page(*page),
        ListParamsOp::SetSort(field) => {
            params.set_sort(field);
            Ok(())
        }
        ListParamsOp::SetPerPage(per_page) => params.set_per_page(*per_page),
        ListParamsOp::SetFilter(filter) => {
            params.set_filter(filter.clone());
            Ok(())
        }
    }
}

/// GET_LIST results carry the total used for the page bounds.
pub(super) fn reduce_success(request: &CrudAction, response: &ProviderResponse, slice: &mut ResourceState) {
    if request.kind() == CrudKind::GetList {
        let total = response.total.unwrap_or(response.records().len() as u64);
        slice.params.set_total(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Filter, Pagination, Record, ResourceConfig, Sort};
    use serde_json::json;

    fn slice_with_total(total: u64) -> ResourceState {
        let mut slice = ResourceState::new(ResourceConfig::new("posts"));
        slice.params.set_total(total);
        slice
    }

    #[test]
    fn list_success_updates_total_only() {
        let mut slice = ResourceState::new(ResourceConfig::new("posts"));
        let request = CrudAction::get_list("posts", Pagination::new(1, 10), Sort::default(), Filter::new());
        let rows = vec![Record::from_json(json!({"id": 1})).unwrap()];
        reduce_success(&request, &ProviderResponse::page(rows, 42), &mut slice);
        assert_eq!(slice.params.total, 42);
        assert_eq!(slice.params.page, 1);
    }

    #[test]
    fn matching_results_do_not_touch_total() {
        let mut slice = slice_with_total(7);
        let request = CrudAction::get_matching("posts", "k", Pagination::default(), Sort::default(), Filter::new());
        reduce_success(&request, &ProviderResponse::page(vec![], 100), &mut slice);
        assert_eq!(slice.params.total, 7);
    }

    #[test]
    fn navigation_ops() {
        let mut slice = slice_with_total(25);
        assert_eq!(reduce_op(&ListParamsOp::NextPage, &mut slice), Ok(()));
        assert_eq!(reduce_op(&ListParamsOp::GotoPage(3), &mut slice), Ok(()));
        assert_eq!(
            reduce_op(&ListParamsOp::NextPage, &mut slice),
            Err(ReduceError::PageOutFromEnd { max: 3 })
        );
        assert_eq!(reduce_op(&ListParamsOp::SetSort("title".into()), &mut slice), Ok(()));
        assert_eq!(slice.params.page, 1);
        assert_eq!(
            reduce_op(&ListParamsOp::PrevPage, &mut slice),
            Err(ReduceError::PageOutFromBegin)
        );
    }
}
