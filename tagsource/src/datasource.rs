//! Data source contract and the built-in adapters.

use std::env;

use crate::value::Value;

/// A key/value lookup capability, the only boundary the decoder reads from.
///
/// `key_path` uses dot notation to address nested structure, e.g.
/// `redis.port` or `address.city.houses.0.id` where numeric segments index
/// sequences. Implementations return `None` for absent keys; the attribute
/// engine then applies defaulting and environment fallback.
pub trait DataSource {
    fn get(&self, key_path: &str) -> Option<Value>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn get(&self, key_path: &str) -> Option<Value> {
        (**self).get(key_path)
    }
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn get(&self, key_path: &str) -> Option<Value> {
        (**self).get(key_path)
    }
}

/// Data source backed by the process environment.
///
/// `get(key)` reads the environment variable literally named `key` (no dot
/// splitting). Unset and empty variables are both reported as absent.
#[derive(Debug, Default)]
pub struct EnvSource;

impl DataSource for EnvSource {
    fn get(&self, key_path: &str) -> Option<Value> {
        if key_path.is_empty() {
            return None;
        }
        match env::var(key_path) {
            Ok(value) if !value.is_empty() => Some(Value::String(value)),
            _ => None,
        }
    }
}

/// Data source backed by an in-memory [`Value`] tree.
///
/// Dot-notation key paths traverse nested maps and arrays; the lookup is
/// absent when any segment is missing or the node kind does not match the
/// segment (e.g. a numeric index into a map-less node).
#[derive(Debug)]
pub struct MapSource {
    root: Value,
}

impl MapSource {
    pub fn new(root: impl Into<Value>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for MapSource {
    fn get(&self, key_path: &str) -> Option<Value> {
        if key_path.is_empty() {
            return None;
        }

        let mut node = &self.root;
        for segment in key_path.split('.') {
            node = match node {
                Value::Map(entries) => entries.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(node.clone())
    }
}

/// Adapter turning any single-argument getter into a [`DataSource`].
pub struct FnSource<F> {
    get: F,
}

impl<F> FnSource<F>
where
    F: Fn(&str) -> Option<Value>,
{
    pub fn new(get: F) -> Self {
        Self { get }
    }
}

impl<F> DataSource for FnSource<F>
where
    F: Fn(&str) -> Option<Value>,
{
    fn get(&self, key_path: &str) -> Option<Value> {
        (self.get)(key_path)
    }
}
