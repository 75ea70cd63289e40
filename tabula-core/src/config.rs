use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tabula_types::{ResourceConfig, ResourceRegistry, Sort, SortOrder, DEFAULT_IDENTIFIER};

use crate::error::CoreError;
use crate::mutation::MutationMode;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    runtime: RuntimeConfig,
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    resources: Vec<ResourceEntry>,
}

#[derive(Deserialize, Default)]
struct RuntimeConfig {
    fetch_delay_ms: Option<u64>,
    reference_debounce_ms: Option<u64>,
    list_retention_secs: Option<u64>,
    mutation_mode: Option<String>,
    event_buffer: Option<usize>,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    per_page: Option<u32>,
    sort_field: Option<String>,
    sort_order: Option<String>,
}

#[derive(Deserialize, Clone)]
struct ResourceEntry {
    name: String,
    identifier: Option<String>,
    per_page: Option<u32>,
    sort_field: Option<String>,
    sort_order: Option<String>,
}

/// Engine configuration: embedded defaults, overridden key by key by a user
/// file.
pub struct Config {
    runtime: RuntimeConfig,
    defaults: DefaultsConfig,
    resources: Vec<ResourceEntry>,
}

impl Config {
    /// Embedded defaults merged with `<config dir>/tabula/config.toml` when
    /// it exists. Malformed user files are logged and ignored.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::embedded(),
        }
    }

    /// Embedded defaults merged with the file at `path`.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::embedded();
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => config.merge(user),
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
        config
    }

    /// Embedded defaults merged with explicit TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        let user: ConfigFile = toml::from_str(text).map_err(|e| CoreError::Config(e.to_string()))?;
        let mut config = Self::embedded();
        config.merge(user);
        Ok(config)
    }

    fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config { runtime: base.runtime, defaults: base.defaults, resources: base.resources }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_runtime(&mut self.runtime, user.runtime);
        merge_defaults(&mut self.defaults, user.defaults);
        if !user.resources.is_empty() {
            self.resources = user.resources;
        }
    }

    /// Add a resource with default settings (replaces one with the same name).
    pub fn with_resource(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.resources.retain(|r| r.name != name);
        self.resources.push(ResourceEntry {
            name,
            identifier: None,
            per_page: None,
            sort_field: None,
            sort_order: None,
        });
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.runtime.fetch_delay_ms = Some(delay.as_millis() as u64);
        self
    }

    pub fn with_mutation_mode(mut self, mode: MutationMode) -> Self {
        self.runtime.mutation_mode = Some(mode.as_str().to_string());
        self
    }

    /// Artificial delay before each provider call.
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.runtime.fetch_delay_ms.unwrap_or(0))
    }

    /// Quiet period of the reference debouncer.
    pub fn reference_debounce(&self) -> Duration {
        Duration::from_millis(self.runtime.reference_debounce_ms.unwrap_or(50))
    }

    pub fn list_retention(&self) -> Duration {
        Duration::from_secs(self.runtime.list_retention_secs.unwrap_or(600))
    }

    pub fn mutation_mode(&self) -> MutationMode {
        self.runtime
            .mutation_mode
            .as_deref()
            .and_then(|s| match MutationMode::from_str(s) {
                Ok(mode) => Some(mode),
                Err(e) => {
                    log::warn!(target: "config", "{}", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Broadcast capacity, clamped to 16..=65536.
    pub fn event_buffer(&self) -> usize {
        self.runtime.event_buffer.unwrap_or(1024).clamp(16, 65_536)
    }

    fn default_per_page(&self) -> u32 {
        self.defaults.per_page.unwrap_or(10).max(1)
    }

    fn default_sort(&self) -> Sort {
        Sort::new(
            self.defaults.sort_field.clone().unwrap_or_else(|| DEFAULT_IDENTIFIER.to_string()),
            self.defaults
                .sort_order
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or(SortOrder::Desc),
        )
    }

    /// The resource registry described by the `[[resources]]` tables.
    pub fn registry(&self) -> ResourceRegistry {
        let default_sort = self.default_sort();
        let mut registry = ResourceRegistry::new();
        for entry in &self.resources {
            let mut sort = default_sort.clone();
            if let Some(field) = &entry.sort_field {
                sort.field = field.clone();
            }
            if let Some(order) = entry.sort_order.as_deref().and_then(SortOrder::parse) {
                sort.order = order;
            }
            let resource = ResourceConfig::new(entry.name.clone())
                .with_identifier(entry.identifier.clone().unwrap_or_else(|| DEFAULT_IDENTIFIER.to_string()))
                .with_per_page(entry.per_page.unwrap_or_else(|| self.default_per_page()))
                .with_sort(sort);
            registry.register(resource);
        }
        registry
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tabula").join("config.toml"))
}

fn merge_runtime(base: &mut RuntimeConfig, user: RuntimeConfig) {
    if user.fetch_delay_ms.is_some() {
        base.fetch_delay_ms = user.fetch_delay_ms;
    }
    if user.reference_debounce_ms.is_some() {
        base.reference_debounce_ms = user.reference_debounce_ms;
    }
    if user.list_retention_secs.is_some() {
        base.list_retention_secs = user.list_retention_secs;
    }
    if user.mutation_mode.is_some() {
        base.mutation_mode = user.mutation_mode;
    }
    if user.event_buffer.is_some() {
        base.event_buffer = user.event_buffer;
    }
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.per_page.is_some() {
        base.per_page = user.per_page;
    }
    if user.sort_field.is_some() {
        base.sort_field = user.sort_field;
    }
    if user.sort_order.is_some() {
        base.sort_order = user.sort_order;
    }
}
