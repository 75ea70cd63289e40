//! The store: one state tree, one mutation point.
//!
//! `dispatch` reduces an action under the write lock, broadcasts it to
//! subscribers, then hands it to the effect engine. Reducers run
//! synchronously, so an action is fully applied before anyone observes it.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tabula_types::reduce::reduce_action;
use tabula_types::{Action, AdminState};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::CoreError;
use crate::mutation::MutationMode;
use crate::provider::DataProvider;
use crate::saga;
use crate::saga::fetch::LatestFetch;
use crate::saga::references::ReferenceBatcher;

/// Runtime knobs read from `Config` once at construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub fetch_delay: Duration,
    pub reference_debounce: Duration,
    pub mutation_mode: MutationMode,
}

pub(crate) struct Inner {
    pub state: RwLock<AdminState>,
    pub events: broadcast::Sender<Action>,
    pub provider: Arc<dyn DataProvider>,
    pub runtime: Handle,
    pub settings: Settings,
    /// Parent of every saga token; cancelled by `shutdown`.
    pub shutdown: CancellationToken,
    pub latest: LatestFetch,
    pub references: ReferenceBatcher,
}

/// Cheap to clone; all clones share the same state and effect engine.
#[derive(Clone)]
pub struct Store {
    pub(crate) inner: Arc<Inner>,
}

impl Store {
    /// Build a store from config. Must be called inside a tokio runtime;
    /// sagas are spawned on it.
    pub fn new(config: &Config, provider: Arc<dyn DataProvider>) -> Result<Self, CoreError> {
        let runtime = Handle::try_current().map_err(|_| CoreError::NoRuntime)?;
        let state = AdminState::new(&config.registry()).with_list_retention(config.list_retention());
        let (events, _) = broadcast::channel(config.event_buffer());
        let settings = Settings {
            fetch_delay: config.fetch_delay(),
            reference_debounce: config.reference_debounce(),
            mutation_mode: config.mutation_mode(),
        };
        log::debug!(
            target: "dispatch",
            "store ready: {} resources, mode {}",
            state.resources.len(),
            settings.mutation_mode.as_str()
        );
        Ok(Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                events,
                provider,
                runtime,
                settings,
                shutdown: CancellationToken::new(),
                latest: LatestFetch::default(),
                references: ReferenceBatcher::default(),
            }),
        })
    }

    /// Apply an action. A precondition violation returns `Err`, leaves the
    /// state untouched, and is neither broadcast nor routed.
    pub fn dispatch(&self, action: Action) -> Result<(), CoreError> {
        {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            let now = tokio::time::Instant::now().into_std();
            if let Err(e) = reduce_action(&action, &mut state, now) {
                log::warn!(target: "dispatch", "{} rejected: {}", action.type_name(), e);
                return Err(e.into());
            }
        }
        log::trace!(target: "dispatch", "{}", action.type_name());
        // Nobody listening is fine.
        let _ = self.inner.events.send(action.clone());
        saga::route(self, &action);
        Ok(())
    }

    /// Dispatch from inside the engine, where a rejection can only be logged.
    pub(crate) fn put(&self, action: Action) {
        let name = action.type_name();
        if let Err(e) = self.dispatch(action) {
            log::error!(target: "dispatch", "engine action {} failed: {}", name, e);
        }
    }

    /// Receive every action applied from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.inner.events.subscribe()
    }

    /// Run `f` against the current state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&AdminState) -> R) -> R {
        let state = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub fn snapshot(&self) -> AdminState {
        self.read(AdminState::clone)
    }

    /// Mutation mode used by `submit`.
    pub fn mutation_mode(&self) -> MutationMode {
        self.inner.settings.mutation_mode
    }

    /// Cancel every in-flight fetch, pending reference flush and open
    /// undo window. Later dispatches still reduce but start no sagas.
    pub fn shutdown(&self) {
        log::debug!(target: "dispatch", "shutting down effect engine");
        self.inner.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.inner.runtime.spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use tabula_types::{ListParamsOp, Notification, ReduceError};

    fn store() -> Store {
        let config = Config::from_toml_str("[[resources]]\nname = \"posts\"\n").unwrap();
        Store::new(&config, Arc::new(MemoryProvider::new())).unwrap()
    }

    #[test]
    fn new_outside_runtime_fails() {
        let config = Config::from_toml_str("").unwrap();
        let result = Store::new(&config, Arc::new(MemoryProvider::new()));
        assert!(matches!(result, Err(CoreError::NoRuntime)));
    }

    #[tokio::test]
    async fn dispatch_reduces_and_broadcasts() {
        let store = store();
        let mut events = store.subscribe();
        store.dispatch(Action::ShowNotification(Notification::info("hi"))).unwrap();
        assert_eq!(store.read(|s| s.ui.notification.clone()), Some(Notification::info("hi")));
        assert_eq!(events.try_recv().unwrap(), Action::ShowNotification(Notification::info("hi")));
    }

    #[tokio::test]
    async fn rejected_dispatch_is_not_broadcast() {
        let store = store();
        let mut events = store.subscribe();
        let before = store.snapshot();
        let result = store.dispatch(Action::ListParams { resource: "posts".into(), op: ListParamsOp::PrevPage });
        assert!(matches!(result, Err(CoreError::Reduce(ReduceError::PageOutFromBegin))));
        assert_eq!(store.snapshot(), before);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn shutdown_is_sticky() {
        let store = store();
        assert!(!store.is_shut_down());
        store.clone().shutdown();
        assert!(store.is_shut_down());
    }
}
