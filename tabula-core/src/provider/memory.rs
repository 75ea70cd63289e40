use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tabula_types::{
    Filter, Pagination, Params, ProviderError, ProviderResponse, Record, RecordId, Sort, SortOrder, Verb,
    DEFAULT_IDENTIFIER,
};

use super::DataProvider;

/// In-process provider over JSON collections.
///
/// Lists filter by field equality, sort, then paginate. Creates assign the
/// next integer id. Unknown ids reject with status 404.
pub struct MemoryProvider {
    identifier: String,
    collections: Mutex<BTreeMap<String, Vec<Record>>>,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self { identifier: DEFAULT_IDENTIFIER.to_string(), collections: Mutex::new(BTreeMap::new()) }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Seed a collection. Non-object values are skipped.
    pub fn with_collection(self, resource: impl Into<String>, rows: Vec<Value>) -> Self {
        let records = rows.into_iter().filter_map(Record::from_json).collect();
        self.lock().insert(resource.into(), records);
        self
    }

    /// Current contents of a collection.
    pub fn records(&self, resource: &str) -> Vec<Record> {
        self.lock().get(resource).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Record>>> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn position(&self, rows: &[Record], id: &RecordId) -> Option<usize> {
        rows.iter().position(|r| r.id(&self.identifier).as_ref() == Some(id))
    }

    fn query(&self, rows: &[Record], pagination: &Pagination, sort: &Sort, filter: &Filter) -> ProviderResponse {
        let mut matching: Vec<Record> = rows.iter().filter(|r| matches_filter(r, filter)).cloned().collect();
        matching.sort_by(|a, b| {
            let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
            match sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        let total = matching.len() as u64;
        let start = pagination.start().min(total) as usize;
        let end = pagination.end().min(total) as usize;
        ProviderResponse::page(matching[start..end].to_vec(), total)
    }
}

#[async_trait]
impl DataProvider for MemoryProvider {
    async fn call(&self, verb: Verb, resource: &str, params: Params) -> Result<ProviderResponse, ProviderError> {
        log::debug!(target: "provider", "memory {} {}", verb, resource);
        let mut collections = self.lock();
        let rows = collections.entry(resource.to_string()).or_default();
        match params {
            Params::GetList { pagination, sort, filter } => Ok(self.query(rows, &pagination, &sort, &filter)),
            Params::GetOne { id } => self
                .position(rows, &id)
                .map(|i| ProviderResponse::one(rows[i].clone()))
                .ok_or_else(|| ProviderError::not_found(resource, &id)),
            Params::GetMany { ids } => {
                let rows: &[Record] = rows;
                Ok(ProviderResponse::many(
                    ids.iter().filter_map(|id| self.position(rows, id).map(|i| rows[i].clone())).collect(),
                ))
            }
            Params::GetManyReference { target, id, pagination, sort, mut filter } => {
                filter.insert(target, id.to_value());
                Ok(self.query(rows, &pagination, &sort, &filter))
            }
            Params::Create { data } => {
                let next = rows
                    .iter()
                    .filter_map(|r| match r.id(&self.identifier) {
                        Some(RecordId::Int(i)) => Some(i),
                        _ => None,
                    })
                    .max()
                    .unwrap_or(0)
                    + 1;
                let record = data.with(self.identifier.clone(), next);
                rows.push(record.clone());
                Ok(ProviderResponse::one(record))
            }
            Params::Update { id, data, .. } => {
                let i = self.position(rows, &id).ok_or_else(|| ProviderError::not_found(resource, &id))?;
                rows[i].merge(&data);
                Ok(ProviderResponse::one(rows[i].clone()))
            }
            Params::Delete { id, .. } => {
                let i = self.position(rows, &id).ok_or_else(|| ProviderError::not_found(resource, &id))?;
                Ok(ProviderResponse::one(rows.remove(i)))
            }
        }
    }
}

/// Every filter key must equal the record's field. Ids and numbers compare
/// by their text, so `{"post_id": "1"}` matches `post_id: 1`.
fn matches_filter(record: &Record, filter: &Filter) -> bool {
    filter.iter().all(|(key, expected)| match record.get(key) {
        Some(actual) => actual == expected || scalar_text(actual).is_some_and(|a| Some(a) == scalar_text(expected)),
        None => false,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Missing fields sort first, numbers numerically, everything else by text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => {
            let text = |v: &Value| scalar_text(v).unwrap_or_else(|| v.to_string());
            text(x).cmp(&text(y))
        }
    }
}
