//! Write modes.
//!
//! - `Pessimistic`: dispatch and wait for the server; the record pool only
//!   changes once it confirms (besides the UPDATE draft write).
//! - `Optimistic`: apply locally, send right away, return immediately.
//! - `Undoable`: apply locally, hold the network call until the undo window
//!   is completed. The default.
//!
//! In the last two modes a failure never rolls the local write back: the
//! caller's `on_error`, if any, decides what to do.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabula_types::{Action, CrudAction, ProviderError, ProviderResponse, RequestId};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::error::CoreError;
use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationMode {
    Pessimistic,
    Optimistic,
    #[default]
    Undoable,
}

impl MutationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationMode::Pessimistic => "pessimistic",
            MutationMode::Optimistic => "optimistic",
            MutationMode::Undoable => "undoable",
        }
    }
}

impl FromStr for MutationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pessimistic" => Ok(MutationMode::Pessimistic),
            "optimistic" => Ok(MutationMode::Optimistic),
            "undoable" => Ok(MutationMode::Undoable),
            other => Err(format!("unknown mutation mode '{}'", other)),
        }
    }
}

/// Failure hook of optimistic and undoable writes.
pub type OnError = Box<dyn FnOnce(&ProviderError) + Send + 'static>;

/// What `Store::mutate` returns.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Pessimistic write confirmed by the server.
    Confirmed(ProviderResponse),
    /// Optimistic write sent; the result arrives as actions.
    Sent(RequestId),
    /// Undo window open; dispatch `Undo` or `CompleteUndoable` with this id.
    Pending(RequestId),
}

impl Store {
    /// Dispatch a read (or any intent) and wait for its outcome.
    ///
    /// Resolves to `CoreError::Cancelled` once the store is shut down.
    pub async fn fetch(&self, request: CrudAction) -> Result<ProviderResponse, CoreError> {
        if self.is_shut_down() {
            return Err(CoreError::Cancelled);
        }
        let events = self.subscribe();
        let id = request.request();
        self.dispatch(Action::Crud(request))?;
        tokio::select! {
            outcome = wait_for_outcome(events, id) => outcome,
            _ = self.inner.shutdown.cancelled() => Err(CoreError::Cancelled),
        }
    }

    /// Run a write in the given mode.
    pub async fn mutate(
        &self,
        request: CrudAction,
        mode: MutationMode,
        on_error: Option<OnError>,
    ) -> Result<MutationOutcome, CoreError> {
        let id = request.request();
        match mode {
            MutationMode::Pessimistic => {
                let response = self.fetch(request).await.map_err(|e| {
                    if let (CoreError::Provider(error), Some(on_error)) = (&e, on_error) {
                        on_error(error);
                    }
                    e
                })?;
                Ok(MutationOutcome::Confirmed(response))
            }
            MutationMode::Optimistic => {
                let events = self.subscribe();
                self.dispatch(Action::Optimistic(request.clone()))?;
                self.dispatch(Action::Crud(request))?;
                self.watch_failure(events, id, on_error);
                Ok(MutationOutcome::Sent(id))
            }
            MutationMode::Undoable => {
                let events = self.subscribe();
                self.dispatch(Action::StartUndoable(request))?;
                self.watch_failure(events, id, on_error);
                Ok(MutationOutcome::Pending(id))
            }
        }
    }

    /// `mutate` in the configured mode.
    pub async fn submit(&self, request: CrudAction, on_error: Option<OnError>) -> Result<MutationOutcome, CoreError> {
        self.mutate(request, self.mutation_mode(), on_error).await
    }

    fn watch_failure(&self, mut events: broadcast::Receiver<Action>, id: RequestId, on_error: Option<OnError>) {
        let Some(on_error) = on_error else {
            return;
        };
        let token = self.inner.shutdown.child_token();
        self.spawn(async move {
            let watch = async {
                loop {
                    match events.recv().await {
                        Ok(Action::CrudFailure(request, error)) if request.request() == id => return Some(error),
                        Ok(Action::CrudSuccess(request, _)) if request.request() == id => return None,
                        Ok(Action::Undo(r) | Action::FetchCancel(r)) if r == id => return None,
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            log::warn!(target: "dispatch", "failure watch for {} missed {} actions", id, skipped);
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            };
            let failure = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                failure = watch => failure,
            };
            if let Some(error) = failure {
                on_error(&error);
            }
        });
    }
}

async fn wait_for_outcome(mut events: broadcast::Receiver<Action>, id: RequestId) -> Result<ProviderResponse, CoreError> {
    loop {
        match events.recv().await {
            Ok(Action::CrudSuccess(request, response)) if request.request() == id => return Ok(response),
            Ok(Action::CrudFailure(request, error)) if request.request() == id => {
                return Err(CoreError::Provider(error))
            }
            Ok(Action::FetchCancel(r)) if r == id => return Err(CoreError::Cancelled),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                log::warn!(target: "dispatch", "waiting for {} missed {} actions", id, skipped);
            }
            Err(RecvError::Closed) => return Err(CoreError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("Pessimistic".parse::<MutationMode>(), Ok(MutationMode::Pessimistic));
        assert_eq!("optimistic".parse::<MutationMode>(), Ok(MutationMode::Optimistic));
        assert!("eventually".parse::<MutationMode>().is_err());
        assert_eq!(MutationMode::default(), MutationMode::Undoable);
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [MutationMode::Pessimistic, MutationMode::Optimistic, MutationMode::Undoable] {
            assert_eq!(mode.as_str().parse::<MutationMode>(), Ok(mode));
        }
    }
}
