//! Read-side selectors over `AdminState`.

use crate::{AdminState, ListParams, Record, RecordId};

pub fn record<'a>(state: &'a AdminState, resource: &str, id: &RecordId) -> Option<&'a Record> {
    state.resource(resource)?.data.get(id)
}

/// Records of the current list window, in window order. Ids missing from
/// the pool are skipped.
pub fn list_records<'a>(state: &'a AdminState, resource: &str) -> Vec<&'a Record> {
    let Some(slice) = state.resource(resource) else {
        return Vec::new();
    };
    slice.list.ids().iter().filter_map(|id| slice.data.get(id)).collect()
}

/// Cached records of a one-to-many relation, or `None` if the relation has
/// never been fetched.
pub fn related_records<'a>(state: &'a AdminState, reference: &str, key: &str) -> Option<Vec<&'a Record>> {
    let ids = state.references.related(key)?;
    let slice = state.resource(reference)?;
    Some(ids.iter().filter_map(|id| slice.data.get(id)).collect())
}

/// Cached candidates of a reference input, or `None` if never fetched.
pub fn possible_values<'a>(state: &'a AdminState, reference: &str, key: &str) -> Option<Vec<&'a Record>> {
    let ids = state.references.possible_values(key)?;
    let slice = state.resource(reference)?;
    Some(ids.iter().filter_map(|id| slice.data.get(id)).collect())
}

/// Ids among `ids` that are not cached yet.
pub fn missing_ids(state: &AdminState, resource: &str, ids: &[RecordId]) -> Vec<RecordId> {
    match state.resource(resource) {
        Some(slice) => ids.iter().filter(|id| !slice.data.contains(id)).cloned().collect(),
        None => ids.to_vec(),
    }
}

pub fn list_params<'a>(state: &'a AdminState, resource: &str) -> Option<&'a ListParams> {
    state.resource(resource).map(|slice| &slice.params)
}

pub fn is_loading(state: &AdminState) -> bool {
    state.ui.loading > 0
}
