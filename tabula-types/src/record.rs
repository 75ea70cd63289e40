use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a record within its resource.
///
/// Ids are normalized when they enter the system: a string holding a
/// canonical integer (`"3"`, not `"03"`) is stored as `Int`. After that,
/// comparisons are strict, so a list window holding `3` matches a delete
/// of `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Normalize a JSON value into an id. Returns `None` for values that
    /// cannot identify a record (null, bool, arrays, objects).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => RecordId::Int(i),
                None => RecordId::Str(n.to_string()),
            }),
            Value::String(s) => Some(Self::from(s.as_str())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(i) => Value::from(*i),
            RecordId::Str(s) => Value::from(s.clone()),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) if n.to_string() == id => RecordId::Int(n),
            _ => RecordId::Str(id.to_string()),
        }
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::from(id.as_str())
    }
}

impl TryFrom<Value> for RecordId {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value).ok_or_else(|| format!("not a record id: {}", value))
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        id.to_value()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{}", i),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// An opaque key-value record as returned by the data provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Only objects are records.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Read the record's id from the given identifier attribute.
    pub fn id(&self, identifier: &str) -> Option<RecordId> {
        self.0.get(identifier).and_then(RecordId::from_value)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Shallow union: every key of `draft` overwrites the same key here,
    /// keys absent from `draft` keep their current value.
    pub fn merge(&mut self, draft: &Record) {
        for (key, value) in &draft.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
