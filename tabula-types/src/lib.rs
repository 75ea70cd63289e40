//! # tabula-types
//!
//! Shared type definitions for the Tabula admin data layer.
//! This crate holds the pure half of the system: records, the action
//! vocabulary, request params, the state tree and the reducers that mutate it.
//! Nothing here performs I/O or spawns tasks; `tabula-core` drives it.

pub mod action;
mod error;
mod params;
mod record;
pub mod reduce;
pub mod select;
pub mod state;

pub use action::*;
pub use error::ReduceError;
pub use params::{
    Filter, Pagination, Params, ProviderError, ProviderResponse, ResponseData, Sort, SortOrder,
    Verb,
};
pub use record::{Record, RecordId};

// Re-export all state types at crate root for convenience
pub use state::*;
