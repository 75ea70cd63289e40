//! The effect engine.
//!
//! Every applied action passes through `route`, which starts the task an
//! action asks for:
//!
//! - `Crud` → a fetch task (`fetch`), cancelled when a newer
//!   cancel-previous intent arrives
//! - `FetchReference` → the per-resource debouncer (`references`)
//! - `StartUndoable` → an undo window (`undo`)
//!
//! Tasks never touch the state directly; they dispatch actions back into
//! the store.

pub(crate) mod fetch;
pub(crate) mod references;
pub(crate) mod undo;

use tabula_types::Action;

use crate::store::Store;

pub(crate) fn route(store: &Store, action: &Action) {
    if store.is_shut_down() {
        return;
    }
    match action {
        Action::Crud(request) => fetch::spawn(store, request.clone()),
        Action::FetchReference { resource, ids } => references::enqueue(store, resource, ids),
        Action::StartUndoable(request) => undo::spawn(store, request.clone()),
        _ => {}
    }
}
