use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Raw caller-supplied field values for one entity, keyed by field name.
///
/// Values are kept as strings; JSON numbers are rendered with their decimal
/// text before they get here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, field: K, value: V) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Input document: a JSON object holding one ordered list of records per
/// entity collection (e.g. `{"payees": [...]}`). Other top-level keys are
/// carried along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(text)
            .map(Self::from_value)
            .map_err(|err| ValidationError::Malformed {
                reason: format!("invalid JSON: {}", err),
            })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ValidationError> {
        serde_json::from_reader(reader)
            .map(Self::from_value)
            .map_err(|err| ValidationError::Malformed {
                reason: format!("invalid JSON: {}", err),
            })
    }

    /// Build a document holding `records` under `collection`, in order.
    pub fn from_records<I>(collection: &str, records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let list = records
            .into_iter()
            .map(|r| {
                Value::Object(
                    r.iter()
                        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                        .collect(),
                )
            })
            .collect();
        let mut root = Map::new();
        root.insert(collection.to_string(), Value::Array(list));
        Self {
            root: Value::Object(root),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// The record list stored under `key`, checking the document shape.
    pub fn collection(&self, key: &str) -> Result<&[Value], ValidationError> {
        let root = self.root.as_object().ok_or_else(|| ValidationError::Malformed {
            reason: format!("expected a top-level object, got {}", json_type(&self.root)),
        })?;
        let list = root.get(key).ok_or_else(|| ValidationError::Malformed {
            reason: format!("missing '{}' collection", key),
        })?;
        list.as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| ValidationError::Malformed {
                reason: format!("'{}' must be an array, got {}", key, json_type(list)),
            })
    }
}

/// JSON type name used in diagnostics.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
