//! Side effects of fetch outcomes.
//!
//! Pure functions from an intent and its result to the notification and
//! navigation actions the fetch task dispatches after `{TYPE}_SUCCESS` or
//! `{TYPE}_FAILURE`. They never touch the state or the provider.
//!
//! | outcome          | effects                                              |
//! |------------------|------------------------------------------------------|
//! | UPDATE success   | "Element updated", navigate per `redirect_to`        |
//! | CREATE success   | "Element created", navigate per `redirect_to`        |
//! | DELETE success   | "Element deleted", navigate per `redirect_to`        |
//! | GET_ONE failure  | with base path: warning + navigate to it; else none  |
//! | other failure    | warning with the error message                       |
//! | other success    | none                                                 |

use tabula_types::{
    Action, CrudAction, CrudIntent, CrudKind, Notification, ProviderError, ProviderResponse, RecordId,
};

pub const ELEMENT_UPDATED: &str = "Element updated";
pub const ELEMENT_CREATED: &str = "Element created";
pub const ELEMENT_DELETED: &str = "Element deleted";
pub const ELEMENT_DOES_NOT_EXIST: &str = "Element does not exist";
pub const HTTP_ERROR: &str = "HTTP Error";
pub const ACTION_UNDONE: &str = "Action undone";

/// Effects of a successful call.
///
/// The network call behind an undo window only refreshes the view: its
/// notification and navigation already happened when the window opened.
pub fn on_success(request: &CrudAction, response: &ProviderResponse, identifier: &str) -> Vec<Action> {
    if request.meta.undoable {
        return vec![Action::RefreshView];
    }
    let id = match &request.intent {
        CrudIntent::Create { .. } => response.record().and_then(|r| r.id(identifier)),
        CrudIntent::Update { id, .. } | CrudIntent::Delete { id, .. } => Some(id.clone()),
        _ => None,
    };
    write_effects(request, id.as_ref(), false)
}

/// Effects shown when an undo window opens: the success notification,
/// flagged undoable, and the success navigation.
pub fn on_undoable(request: &CrudAction) -> Vec<Action> {
    let id = match &request.intent {
        CrudIntent::Update { id, .. } | CrudIntent::Delete { id, .. } => Some(id.clone()),
        _ => None,
    };
    write_effects(request, id.as_ref(), true)
}

/// Effects of a rejected call.
pub fn on_failure(request: &CrudAction, error: &ProviderError) -> Vec<Action> {
    if let CrudIntent::GetOne { base_path, .. } = &request.intent {
        return match base_path {
            Some(path) => vec![
                Action::ShowNotification(Notification::warning(ELEMENT_DOES_NOT_EXIST)),
                Action::Navigate(path.clone()),
            ],
            None => Vec::new(),
        };
    }
    log::error!(target: "side_effects", "{} on '{}': {}", request.kind().as_str(), request.resource(), error);
    let text = if error.message.is_empty() { HTTP_ERROR } else { error.message.as_str() };
    let mut effects = vec![Action::ShowNotification(Notification::warning(text))];
    if request.meta.undoable {
        effects.push(Action::RefreshView);
    }
    effects
}

fn write_effects(request: &CrudAction, id: Option<&RecordId>, undoable: bool) -> Vec<Action> {
    let text = match request.kind() {
        CrudKind::Update => ELEMENT_UPDATED,
        CrudKind::Create => ELEMENT_CREATED,
        CrudKind::Delete => ELEMENT_DELETED,
        CrudKind::GetList
        | CrudKind::GetOne
        | CrudKind::GetMany
        | CrudKind::GetMatching
        | CrudKind::GetManyReference => return Vec::new(),
    };
    let notification = if undoable { Notification::undoable(text) } else { Notification::info(text) };
    let mut effects = vec![Action::ShowNotification(notification)];
    if let Some(path) = redirect_path(request, id) {
        effects.push(Action::Navigate(path));
    }
    effects
}

fn redirect_path(request: &CrudAction, id: Option<&RecordId>) -> Option<String> {
    let redirect_to = match &request.intent {
        CrudIntent::Create { redirect_to, .. }
        | CrudIntent::Update { redirect_to, .. }
        | CrudIntent::Delete { redirect_to, .. } => redirect_to,
        _ => return None,
    };
    let base_path = request.intent.base_path()?;
    redirect_to.resolve(base_path, id)
}
