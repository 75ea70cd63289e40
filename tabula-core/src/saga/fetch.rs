//! Fetch orchestration.
//!
//! One task per CRUD intent:
//!
//! ```text
//! {TYPE}_LOADING, FETCH_START
//!   [fetch delay] provider.call(verb, resource, params)
//!     ok     → {TYPE}_SUCCESS, side effects, FETCH_END
//!     err    → {TYPE}_FAILURE, side effects, FETCH_ERROR
//!     cancel → FETCH_CANCEL
//! ```
//!
//! Intents with `cancel_previous` share a single "latest" slot: starting one
//! cancels whichever such intent is still in flight. Its result, if it ever
//! arrives, is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tabula_types::{Action, CrudAction, ProviderError, ProviderResponse, RequestId};
use tokio_util::sync::CancellationToken;

use crate::side_effects;
use crate::store::Store;

/// The cancel-previous intent currently in flight.
///
/// Slots are keyed by a per-spawn generation, not by `RequestId`: the same
/// intent may be dispatched more than once.
#[derive(Default)]
pub(crate) struct LatestFetch {
    slot: Mutex<Option<(u64, RequestId, CancellationToken)>>,
    generation: AtomicU64,
}

impl LatestFetch {
    fn supersede(&self, request: RequestId, token: CancellationToken) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, previous, previous_token)) = slot.replace((generation, request, token)) {
            log::debug!(target: "saga::fetch", "{} supersedes {}", request, previous);
            previous_token.cancel();
        }
        generation
    }

    fn release(&self, generation: u64) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|(current, _, _)| *current == generation) {
            *slot = None;
        }
    }
}

pub(crate) fn spawn(store: &Store, request: CrudAction) {
    let token = store.inner.shutdown.child_token();
    let generation = request
        .meta
        .cancel_previous
        .then(|| store.inner.latest.supersede(request.request(), token.clone()));
    let task_store = store.clone();
    store.spawn(async move {
        handle_fetch(&task_store, request, token).await;
        if let Some(generation) = generation {
            task_store.inner.latest.release(generation);
        }
    });
}

async fn handle_fetch(store: &Store, request: CrudAction, token: CancellationToken) {
    let id = request.request();
    store.put(Action::CrudLoading(request.clone()));
    store.put(Action::FetchStart(id));

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => None,
        result = call_provider(store, &request) => Some(result),
    };

    // A result that lands after cancellation is discarded too.
    let result = match outcome {
        Some(result) if !token.is_cancelled() => result,
        _ => {
            log::debug!(target: "saga::fetch", "{} {} cancelled", request.kind().as_str(), id);
            store.put(Action::FetchCancel(id));
            return;
        }
    };

    match result {
        Ok(response) => {
            let identifier = store.read(|state| state.identifier(request.resource()).to_string());
            let effects = side_effects::on_success(&request, &response, &identifier);
            store.put(Action::CrudSuccess(request, response));
            for effect in effects {
                store.put(effect);
            }
            store.put(Action::FetchEnd(id));
        }
        Err(error) => {
            log::debug!(target: "saga::fetch", "{} {} failed: {}", request.kind().as_str(), id, error);
            let effects = side_effects::on_failure(&request, &error);
            store.put(Action::CrudFailure(request, error));
            for effect in effects {
                store.put(effect);
            }
            store.put(Action::FetchError(id));
        }
    }
}

async fn call_provider(store: &Store, request: &CrudAction) -> Result<ProviderResponse, ProviderError> {
    let delay = store.inner.settings.fetch_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let verb = request.kind().verb();
    store.inner.provider.call(verb, request.resource(), request.intent.params()).await
}
