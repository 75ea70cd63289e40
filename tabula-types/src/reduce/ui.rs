use crate::{Action, UiState};

pub(super) fn reduce(action: &Action, ui: &mut UiState) {
    match action {
        Action::FetchStart(_) => ui.loading += 1,
        Action::FetchEnd(_) | Action::FetchError(_) | Action::FetchCancel(_) => {
            ui.loading = ui.loading.saturating_sub(1);
        }
        Action::ShowNotification(notification) => ui.notification = Some(notification.clone()),
        Action::HideNotification => ui.notification = None,
        Action::Navigate(path) => ui.location = Some(path.clone()),
        Action::RefreshView => ui.view_version += 1,
        _ => {}
    }
}
