//! Reference lookup coalescing.
//!
//! Many views on one screen each ask for a handful of foreign-key records.
//! Lookups are accumulated per resource and flushed as a single GET_MANY
//! once the resource has been quiet for the debounce period. Every new
//! lookup restarts that resource's countdown; other resources are not
//! affected.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use tabula_types::{Action, CrudAction, RecordId};
use tokio_util::sync::CancellationToken;

use crate::store::Store;

struct PendingBatch {
    ids: BTreeSet<RecordId>,
    timer: CancellationToken,
}

#[derive(Default)]
pub(crate) struct ReferenceBatcher {
    pending: Mutex<HashMap<String, PendingBatch>>,
}

pub(crate) fn enqueue(store: &Store, resource: &str, ids: &[RecordId]) {
    let timer = store.inner.shutdown.child_token();
    {
        let mut pending = store.inner.references.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let batch = pending.entry(resource.to_string()).or_insert_with(|| PendingBatch {
            ids: BTreeSet::new(),
            timer: CancellationToken::new(),
        });
        batch.timer.cancel();
        batch.ids.extend(ids.iter().cloned());
        batch.timer = timer.clone();
    }

    let debounce = store.inner.settings.reference_debounce;
    let task_store = store.clone();
    let resource = resource.to_string();
    store.spawn(async move {
        tokio::select! {
            biased;
            _ = timer.cancelled() => {}
            _ = tokio::time::sleep(debounce) => flush(&task_store, &resource, &timer),
        }
    });
}

fn flush(store: &Store, resource: &str, timer: &CancellationToken) {
    let ids = {
        let mut pending = store.inner.references.pending.lock().unwrap_or_else(PoisonError::into_inner);
        // Re-checked under the lock: a lookup that arrived meanwhile owns the batch.
        if timer.is_cancelled() {
            return;
        }
        match pending.remove(resource) {
            Some(batch) => batch.ids,
            None => return,
        }
    };
    if ids.is_empty() {
        return;
    }
    log::debug!(target: "saga::references", "flushing {} '{}' ids", ids.len(), resource);
    store.put(Action::Crud(CrudAction::get_many(resource, ids.into_iter().collect())));
}
