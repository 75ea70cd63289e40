//! Undo windows.
//!
//! `START_UNDOABLE` applies the write locally, shows the success
//! notification with an Undo affordance, then waits. `UNDO` for the same
//! request abandons it (no network call); `COMPLETE_UNDOABLE` dispatches the
//! real intent. There is no timer: whoever shows the notification decides
//! when the window closes.

use tabula_types::{Action, CrudAction, Notification};
use tokio::sync::broadcast::error::RecvError;

use crate::side_effects::{self, ACTION_UNDONE};
use crate::store::Store;

enum Decision {
    Undo,
    Complete,
}

pub(crate) fn spawn(store: &Store, request: CrudAction) {
    // Subscribed before anything else is dispatched so no decision is missed.
    let mut events = store.subscribe();
    let token = store.inner.shutdown.child_token();
    let id = request.request();

    // The local write lands before `dispatch(StartUndoable)` returns.
    store.put(Action::Optimistic(request.clone()));
    for effect in side_effects::on_undoable(&request) {
        store.put(effect);
    }

    let task_store = store.clone();
    store.spawn(async move {
        let store = task_store;
        let wait = async {
            loop {
                match events.recv().await {
                    Ok(Action::Undo(r)) if r == id => return Some(Decision::Undo),
                    Ok(Action::CompleteUndoable(r)) if r == id => return Some(Decision::Complete),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!(target: "saga::undo", "{} missed {} actions", id, skipped);
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        };
        let decision = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            decision = wait => decision,
        };

        match decision {
            Some(Decision::Undo) => {
                log::debug!(target: "saga::undo", "{} {} undone", request.kind().as_str(), id);
                store.put(Action::ShowNotification(Notification::info(ACTION_UNDONE)));
                store.put(Action::RefreshView);
            }
            Some(Decision::Complete) => {
                let mut real = request;
                real.meta.undoable = true;
                store.put(Action::Crud(real));
            }
            None => log::debug!(target: "saga::undo", "{} window closed without decision", id),
        }
    });
}
