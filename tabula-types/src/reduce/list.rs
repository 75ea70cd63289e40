use std::time::{Duration, Instant};

use crate::{CrudAction, CrudIntent, ProviderResponse, ResourceState};

pub(super) fn reduce_success(
    request: &CrudAction,
    response: &ProviderResponse,
    slice: &mut ResourceState,
    now: Instant,
    retention: Duration,
) {
    let identifier = slice.config.identifier.clone();
    match &request.intent {
        // A page boundary reflects exactly what the server returned.
        CrudIntent::GetList { .. } => slice.list.replace(response.ids(&identifier), now),
        CrudIntent::GetMany { .. } => slice.list.merge_fresh(&response.ids(&identifier), now, retention),
        CrudIntent::Delete { id, .. } => {
            slice.list.remove_first(id);
        }
        CrudIntent::GetOne { .. }
        | CrudIntent::GetMatching { .. }
        | CrudIntent::GetManyReference { .. }
        | CrudIntent::Create { .. }
        | CrudIntent::Update { .. } => {}
    }
}

/// An optimistic delete disappears from the list before the server answers.
pub(super) fn reduce_optimistic(request: &CrudAction, slice: &mut ResourceState) {
    if let CrudIntent::Delete { id, .. } = &request.intent {
        slice.list.remove_first(id);
    }
}
