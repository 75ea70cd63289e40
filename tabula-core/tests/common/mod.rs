#![allow(dead_code)]
//! Test harness utilities for tabula-core integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tabula_core::config::Config;
use tabula_core::provider::{DataProvider, MemoryProvider};
use tabula_core::{Action, MutationMode, Params, ProviderError, ProviderResponse, Store, Verb};
use tokio::sync::broadcast;

/// One provider call as seen by `ScriptedProvider`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub verb: Verb,
    pub resource: String,
    pub params: Params,
}

/// A `MemoryProvider` that records every call and can be told to stall or
/// fail upcoming calls.
pub struct ScriptedProvider {
    memory: MemoryProvider,
    calls: Mutex<Vec<Call>>,
    delays: Mutex<VecDeque<Duration>>,
    failures: Mutex<VecDeque<ProviderError>>,
}

impl ScriptedProvider {
    pub fn new(memory: MemoryProvider) -> Arc<Self> {
        Arc::new(Self {
            memory,
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
            failures: Mutex::new(VecDeque::new()),
        })
    }

    /// Delay applied to the next calls, in call order.
    pub fn delay_next(&self, delays: &[Duration]) {
        self.delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn fail_next(&self, error: ProviderError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, verb: Verb) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.verb == verb).collect()
    }

    pub fn memory(&self) -> &MemoryProvider {
        &self.memory
    }
}

#[async_trait]
impl DataProvider for ScriptedProvider {
    async fn call(&self, verb: Verb, resource: &str, params: Params) -> Result<ProviderResponse, ProviderError> {
        self.calls.lock().unwrap().push(Call { verb, resource: resource.to_string(), params: params.clone() });
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failures.lock().unwrap().pop_front();
        if let Some(error) = failure {
            return Err(error);
        }
        self.memory.call(verb, resource, params).await
    }
}

/// Posts 1..=count, titled "post N".
pub fn posts(count: i64) -> Vec<Value> {
    (1..=count).map(|id| json!({"id": id, "title": format!("post {}", id)})).collect()
}

pub fn seeded_memory() -> MemoryProvider {
    MemoryProvider::new()
        .with_collection("posts", posts(4))
        .with_collection("users", vec![json!({"id": 7, "name": "ann"}), json!({"id": 8, "name": "bob"})])
        .with_collection(
            "comments",
            vec![json!({"id": 1, "post_id": 1}), json!({"id": 2, "post_id": 1}), json!({"id": 3, "post_id": 2})],
        )
}

pub fn test_config(mode: MutationMode) -> Config {
    let _ = env_logger::builder().is_test(true).try_init();
    Config::from_toml_str(
        r#"
        [[resources]]
        name = "posts"

        [[resources]]
        name = "users"

        [[resources]]
        name = "comments"
        "#,
    )
    .unwrap()
    .with_mutation_mode(mode)
}

/// A store over `seeded_memory()` in pessimistic mode.
pub fn make_store() -> (Store, Arc<ScriptedProvider>) {
    make_store_with(test_config(MutationMode::Pessimistic), seeded_memory())
}

pub fn make_store_with(config: Config, memory: MemoryProvider) -> (Store, Arc<ScriptedProvider>) {
    let provider = ScriptedProvider::new(memory);
    let store = Store::new(&config, provider.clone()).unwrap();
    (store, provider)
}

/// Let every ready task run. With the clock paused this advances time by
/// one millisecond at most.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Everything broadcast so far.
pub fn drain(events: &mut broadcast::Receiver<Action>) -> Vec<Action> {
    let mut out = Vec::new();
    while let Ok(action) = events.try_recv() {
        out.push(action);
    }
    out
}

pub fn names(actions: &[Action]) -> Vec<String> {
    actions.iter().map(Action::type_name).collect()
}
