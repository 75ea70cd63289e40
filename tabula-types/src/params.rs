//! Request params and provider results.
//!
//! These are the values that cross the data-provider seam:
//! `call(verb, resource, params) -> Result<ProviderResponse, ProviderError>`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Record, RecordId};

/// Free-form list filter, forwarded to the provider untouched.
pub type Filter = Map<String, Value>;

/// The provider verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verb {
    GetList,
    GetOne,
    GetMany,
    GetManyReference,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::GetList => "GET_LIST",
            Verb::GetOne => "GET_ONE",
            Verb::GetMany => "GET_MANY",
            Verb::GetManyReference => "GET_MANY_REFERENCE",
            Verb::Create => "CREATE",
            Verb::Update => "UPDATE",
            Verb::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self { field: field.into(), order }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::new("id", SortOrder::Desc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Zero-based index of the first row on this page.
    pub fn start(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Zero-based index one past the last row on this page.
    pub fn end(&self) -> u64 {
        u64::from(self.page) * u64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Provider params, one shape per verb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Params {
    GetList {
        pagination: Pagination,
        sort: Sort,
        filter: Filter,
    },
    GetOne {
        id: RecordId,
    },
    GetMany {
        ids: Vec<RecordId>,
    },
    GetManyReference {
        target: String,
        id: RecordId,
        pagination: Pagination,
        sort: Sort,
        filter: Filter,
    },
    Create {
        data: Record,
    },
    Update {
        id: RecordId,
        data: Record,
        previous_data: Option<Record>,
    },
    Delete {
        id: RecordId,
        previous_data: Option<Record>,
    },
}

impl Params {
    pub fn verb(&self) -> Verb {
        match self {
            Params::GetList { .. } => Verb::GetList,
            Params::GetOne { .. } => Verb::GetOne,
            Params::GetMany { .. } => Verb::GetMany,
            Params::GetManyReference { .. } => Verb::GetManyReference,
            Params::Create { .. } => Verb::Create,
            Params::Update { .. } => Verb::Update,
            Params::Delete { .. } => Verb::Delete,
        }
    }
}

/// Normalized `data` of a provider result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    One(Record),
    Many(Vec<Record>),
}

/// A successful provider result: `{data, total?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub data: ResponseData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl ProviderResponse {
    pub fn one(record: Record) -> Self {
        Self { data: ResponseData::One(record), total: None }
    }

    pub fn many(records: Vec<Record>) -> Self {
        Self { data: ResponseData::Many(records), total: None }
    }

    /// A page of a list, with the total row count across all pages.
    pub fn page(records: Vec<Record>, total: u64) -> Self {
        Self { data: ResponseData::Many(records), total: Some(total) }
    }

    pub fn records(&self) -> &[Record] {
        match &self.data {
            ResponseData::One(record) => std::slice::from_ref(record),
            ResponseData::Many(records) => records,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match &self.data {
            ResponseData::One(record) => Some(record),
            ResponseData::Many(records) => records.first(),
        }
    }

    /// Ids of the returned records, in server order. Records without an id
    /// under `identifier` are skipped.
    pub fn ids(&self, identifier: &str) -> Vec<RecordId> {
        self.records().iter().filter_map(|r| r.id(identifier)).collect()
    }
}

/// A rejected provider call: `{message, status?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self { message: message.into(), status: Some(status) }
    }

    pub fn not_found(resource: &str, id: &RecordId) -> Self {
        Self::with_status(format!("{} {} not found", resource, id), 404)
    }
}
