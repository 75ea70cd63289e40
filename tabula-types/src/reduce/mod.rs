//! Pure state-mutation reducers.
//!
//! These functions are the single source of truth for action → state
//! mutations. `tabula-core`'s store calls `reduce_action` under its write
//! lock, so every mutation is serialized through one point.
//!
//! Reducers are pure: they mutate `AdminState` only. They do NOT:
//! - Call the data provider
//! - Produce side-effect actions (notifications, navigation)
//! - Schedule or cancel tasks
//!
//! Slice reducers only ever see actions addressed to their own resource.

mod data;
mod list;
mod params;
mod references;
mod ui;

use std::time::Instant;

use crate::{Action, AdminState, ReduceError};

/// Apply an action to the state.
///
/// `now` stamps list-window entries. Precondition violations (pagination out
/// of range, unknown resource for a params op) return `Err` and leave the
/// state untouched.
pub fn reduce_action(action: &Action, state: &mut AdminState, now: Instant) -> Result<(), ReduceError> {
    match action {
        Action::Crud(request) => {
            if let Some(slice) = state.resource_mut(request.resource()) {
                data::reduce_intent(request, slice);
            }
        }
        Action::Optimistic(request) => {
            if let Some(slice) = state.resource_mut(request.resource()) {
                data::reduce_intent(request, slice);
                list::reduce_optimistic(request, slice);
            }
        }
        Action::CrudSuccess(request, response) => {
            let retention = state.list_retention;
            if let Some(slice) = state.resource_mut(request.resource()) {
                data::reduce_success(request, response, slice);
                list::reduce_success(request, response, slice, now, retention);
                params::reduce_success(request, response, slice);
            } else {
                log::debug!(target: "reduce", "{} for unregistered resource '{}'", action.type_name(), request.resource());
            }
            let identifier = state.identifier(request.resource()).to_string();
            references::reduce_success(request, response, &identifier, &mut state.references);
        }
        Action::ListParams { resource, op } => {
            let slice = state
                .resource_mut(resource)
                .ok_or_else(|| ReduceError::UnknownResource(resource.clone()))?;
            params::reduce_op(op, slice)?;
        }
        Action::FetchStart(_)
        | Action::FetchEnd(_)
        | Action::FetchError(_)
        | Action::FetchCancel(_)
        | Action::ShowNotification(_)
        | Action::HideNotification
        | Action::Navigate(_)
        | Action::RefreshView => ui::reduce(action, &mut state.ui),

        // Lifecycle markers and effect-engine triggers carry no state.
        Action::CrudLoading(_)
        | Action::CrudFailure(_, _)
        | Action::StartUndoable(_)
        | Action::Undo(_)
        | Action::CompleteUndoable(_)
        | Action::FetchReference { .. } => {}
    }
    Ok(())
}
