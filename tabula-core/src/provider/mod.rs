//! The data-provider seam.
//!
//! The engine never talks to a backend directly: every fetch goes through
//! `DataProvider::call(verb, resource, params)`. Two implementations ship
//! with the crate: `RestDataProvider` (an HTTP flavor plus an HTTP client)
//! and `MemoryProvider` (in-process collections, for tests and demos).

mod json_server;
mod memory;
mod rest;

use async_trait::async_trait;
use tabula_types::{Params, ProviderError, ProviderResponse, Verb};

pub use json_server::JsonServerFlavor;
pub use memory::MemoryProvider;
pub use rest::{HttpClient, HttpRequest, HttpResponse, Method, RestDataProvider, RestFlavor};

/// Backend adapter. Implementations resolve to `{data, total?}` or reject
/// with `{message, status?}`. No timeout is applied around the call.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn call(&self, verb: Verb, resource: &str, params: Params) -> Result<ProviderResponse, ProviderError>;
}
