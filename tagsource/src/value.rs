//! Dynamic value model shared by data sources and the attribute engine.

use std::collections::BTreeMap;

/// A dynamically typed raw or resolved value.
///
/// Data sources hand values of any supported kind to the [`Attribute`]
/// engine, which dispatches on the variant: strings go through the full
/// validation/coercion path, already-typed scalars only get range checks,
/// and containers are stored verbatim for the decoder to walk.
///
/// `Null` marks an explicitly absent entry *inside* a container; absence at
/// the [`DataSource::get`] boundary is `None`.
///
/// [`Attribute`]: crate::Attribute
/// [`DataSource::get`]: crate::DataSource::get
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this value is the absence marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the dynamic kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(number) => {
                if let Some(v) = number.as_i64() {
                    Value::Int(v)
                } else if let Some(v) = number.as_u64() {
                    Value::Uint(v)
                } else {
                    Value::Float(number.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(v) => Value::String(v),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}
