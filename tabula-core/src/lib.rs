//! # tabula-core
//!
//! Engine of the Tabula admin data layer. Owns the state tree, serializes every
//! mutation through one dispatch point, and runs the effect engine that talks
//! to the data provider.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tabula_core::config::Config;
//! use tabula_core::provider::MemoryProvider;
//! use tabula_core::store::Store;
//! use tabula_core::{CrudAction, Record};
//!
//! // 1. Build the resource registry from config
//! let config = Config::load().with_resource("posts");
//!
//! // 2. Plug in a data provider (REST flavor, in-memory, or your own)
//! let provider = Arc::new(MemoryProvider::new());
//!
//! // 3. Create the store inside a tokio runtime
//! let store = Store::new(&config, provider)?;
//!
//! // 4. Dispatch intents; the effect engine answers with lifecycle actions
//! store.dispatch(Action::Crud(CrudAction::get_one("posts", 1, Some("/posts"))))?;
//!
//! // 5. Or await a read / run a write in a mutation mode
//! let page = store.fetch(CrudAction::get_list("posts", pagination, sort, filter)).await?;
//! store.mutate(CrudAction::create("posts", draft, Some("/posts")), MutationMode::Undoable, None).await?;
//!
//! // 6. Watch the action stream / read state through selectors
//! let mut events = store.subscribe();
//! let rows = store.read(|state| select::list_records(state, "posts").len());
//! ```
//!
//! ## Module Overview
//!
//! - [`store`]: `Store`: state behind one lock, dispatch, action broadcast
//! - `saga`: fetch orchestration with cancellation, reference debouncer,
//!   undoable gate
//! - [`side_effects`]: notifications and navigation produced by fetch outcomes
//! - [`mutation`]: pessimistic / optimistic / undoable write modes
//! - [`provider`]: `DataProvider` seam, REST flavors, in-memory provider
//! - [`config`]: embedded defaults + user `config.toml`

pub mod config;
mod error;
pub mod mutation;
pub mod provider;
mod saga;
pub mod side_effects;
pub mod store;

pub use error::CoreError;
pub use mutation::{MutationMode, MutationOutcome, OnError};
pub use store::Store;

// Re-export the type vocabulary so callers need one dependency.
pub use tabula_types::*;
