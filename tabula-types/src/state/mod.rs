//! The state tree.
//!
//! One `ResourceState` per registered resource (record pool, list window,
//! query params), plus the cross-resource reference index and UI bookkeeping.
//! Only `reduce::reduce_action` mutates it.

mod list_params;
mod list_window;
mod record_store;
mod references;

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use list_params::ListParams;
pub use list_window::ListWindow;
pub use record_store::RecordStore;
pub use references::{relation_key, ReferenceIndex};

use crate::{Notification, Sort};

/// Default retention of list-window entries refreshed by GET_MANY.
pub const DEFAULT_LIST_RETENTION: Duration = Duration::from_secs(10 * 60);

pub const DEFAULT_IDENTIFIER: &str = "id";
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Static description of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    /// Attribute holding the record id.
    pub identifier: String,
    pub per_page: u32,
    pub sort: Sort,
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: DEFAULT_IDENTIFIER.to_string(),
            per_page: DEFAULT_PER_PAGE,
            sort: Sort::default(),
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }
}

/// The set of resources known at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRegistry {
    resources: Vec<ResourceConfig>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource, replacing any earlier entry with the same name.
    pub fn register(&mut self, config: ResourceConfig) {
        if let Some(existing) = self.resources.iter_mut().find(|r| r.name == config.name) {
            *existing = config;
        } else {
            self.resources.push(config);
        }
    }

    pub fn with(mut self, config: ResourceConfig) -> Self {
        self.register(config);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Per-resource slice: record pool, current list window, query params.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState {
    pub config: ResourceConfig,
    pub data: RecordStore,
    pub list: ListWindow,
    pub params: ListParams,
}

impl ResourceState {
    pub fn new(config: ResourceConfig) -> Self {
        Self {
            data: RecordStore::new(config.identifier.clone()),
            list: ListWindow::new(),
            params: ListParams::new(config.per_page, config.sort.clone()),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }
}

/// Loading counter, current notification, last location, view version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Number of fetches between FETCH_START and their END/ERROR/CANCEL.
    pub loading: u32,
    pub notification: Option<Notification>,
    pub location: Option<String>,
    /// Bumped by REFRESH_VIEW; views refetch when it changes.
    pub view_version: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminState {
    pub resources: BTreeMap<String, ResourceState>,
    pub references: ReferenceIndex,
    pub ui: UiState,
    /// How long GET_MANY-fetched list entries stay valid.
    pub list_retention: Duration,
}

impl AdminState {
    pub fn new(registry: &ResourceRegistry) -> Self {
        let resources = registry
            .iter()
            .map(|config| (config.name.clone(), ResourceState::new(config.clone())))
            .collect();
        Self {
            resources,
            references: ReferenceIndex::default(),
            ui: UiState::default(),
            list_retention: DEFAULT_LIST_RETENTION,
        }
    }

    pub fn with_list_retention(mut self, retention: Duration) -> Self {
        self.list_retention = retention;
        self
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceState> {
        self.resources.get(name)
    }

    pub fn resource_mut(&mut self, name: &str) -> Option<&mut ResourceState> {
        self.resources.get_mut(name)
    }

    /// Identifier attribute of a resource; `"id"` for unregistered ones.
    pub fn identifier(&self, resource: &str) -> &str {
        self.resources
            .get(resource)
            .map(|r| r.config.identifier.as_str())
            .unwrap_or(DEFAULT_IDENTIFIER)
    }
}
