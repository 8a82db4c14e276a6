//! Recursive record decoding over a [`DataSource`].

use std::collections::HashMap;

use crate::attribute::Attribute;
use crate::datasource::{DataSource, EnvSource};
use crate::error::TagError;
use crate::value::Value;

/// Drives a recursive decode of a typed record from a [`DataSource`].
///
/// Holds the raw-value source and an injected environment lookup used by
/// `env=` fallback. The environment defaults to the real process
/// environment; tests swap in a deterministic source.
pub struct Decoder {
    source: Box<dyn DataSource>,
    environ: Box<dyn DataSource>,
}

impl Decoder {
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            environ: Box::new(EnvSource),
        }
    }

    /// Replace the environment lookup used for `env=` fallback.
    pub fn with_environ(mut self, environ: impl DataSource + 'static) -> Self {
        self.environ = Box::new(environ);
        self
    }

    pub fn source(&self) -> &dyn DataSource {
        &*self.source
    }

    pub fn environ(&self) -> &dyn DataSource {
        &*self.environ
    }

    /// Populate `target` in place from the source, starting at the root
    /// key-path prefix. Stops at the first failing field.
    pub fn decode<T: TagDecode>(&self, target: &mut T) -> Result<(), TagError> {
        target.decode_fields(self, "")
    }

    /// Assign a resolved scalar or sequence value into a field. A `Null`
    /// resolution leaves the field's current content untouched.
    pub fn bind<T: FieldValue>(
        &self,
        target: &mut T,
        attribute: &Attribute,
    ) -> Result<(), TagError> {
        let value = attribute.value();
        if value.is_null() {
            return Ok(());
        }
        T::assign(target, value, &attribute.key_path())
    }

    /// Recurse into a nested record field. Recursion happens whether or not
    /// the source has an entry for the record's path, so nested defaults
    /// and `required` checks always run.
    pub fn bind_struct<T: TagDecode>(
        &self,
        target: &mut T,
        attribute: &Attribute,
    ) -> Result<(), TagError> {
        target.decode_fields(self, &attribute.key_path())
    }

    /// Decode a sequence of nested records. Each element is decoded from
    /// the source under `<path>.<index>`, so elements may carry their own
    /// defaults and constraints.
    pub fn bind_struct_list<T: TagDecode + Default>(
        &self,
        target: &mut Vec<T>,
        attribute: &Attribute,
    ) -> Result<(), TagError> {
        let key_path = attribute.key_path();
        match attribute.value() {
            Value::Null => Ok(()),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::Map(_) | Value::Null => {
                            let mut element = T::default();
                            element
                                .decode_fields(self, &format!("{}.{}", key_path, index))
                                .map_err(|err| TagError::Slice {
                                    path: key_path.clone(),
                                    source: Box::new(err),
                                })?;
                            target.push(element);
                        }
                        other => {
                            return Err(TagError::Unsupported {
                                kind: other.kind(),
                                path: format!("{}.{}", key_path, index),
                            });
                        }
                    }
                }
                Ok(())
            }
            other => Err(TagError::Unsupported {
                kind: other.kind(),
                path: key_path,
            }),
        }
    }

    /// Decode a map of scalar values. A `Null` entry inserts the value
    /// type's default as a placeholder for the key.
    pub fn bind_map<V: FieldValue + Default>(
        &self,
        target: &mut HashMap<String, V>,
        attribute: &Attribute,
    ) -> Result<(), TagError> {
        let key_path = attribute.key_path();
        match attribute.value() {
            Value::Null => Ok(()),
            Value::Map(entries) => {
                for (key, value) in entries {
                    let mut slot = V::default();
                    if !value.is_null() {
                        V::assign(&mut slot, value, &format!("{}.{}", key_path, key))?;
                    }
                    target.insert(key.clone(), slot);
                }
                Ok(())
            }
            other => Err(TagError::Unsupported {
                kind: other.kind(),
                path: key_path,
            }),
        }
    }

    /// Decode a map of nested records, each keyed entry decoded from the
    /// source under `<path>.<key>`.
    pub fn bind_struct_map<T: TagDecode + Default>(
        &self,
        target: &mut HashMap<String, T>,
        attribute: &Attribute,
    ) -> Result<(), TagError> {
        let key_path = attribute.key_path();
        match attribute.value() {
            Value::Null => Ok(()),
            Value::Map(entries) => {
                for key in entries.keys() {
                    let mut element = T::default();
                    element.decode_fields(self, &format!("{}.{}", key_path, key))?;
                    target.insert(key.clone(), element);
                }
                Ok(())
            }
            other => Err(TagError::Unsupported {
                kind: other.kind(),
                path: key_path,
            }),
        }
    }
}

/// A record whose fields can be populated from a [`Decoder`].
///
/// Implemented by `#[derive(TagDecode)]`; the derive generates one
/// attribute-resolve-bind step per field.
pub trait TagDecode {
    /// Decode every field, with `key_path_parent` as the dotted prefix of
    /// this record within the source ("" at the root).
    fn decode_fields(
        &mut self,
        decoder: &Decoder,
        key_path_parent: &str,
    ) -> Result<(), TagError>;

    /// Decode a fresh record from a source with the default environment.
    fn decode_from<S: DataSource + 'static>(source: S) -> Result<Self, TagError>
    where
        Self: Sized + Default,
    {
        let mut target = Self::default();
        Decoder::new(source).decode(&mut target)?;
        Ok(target)
    }
}

/// Assignment of a resolved [`Value`] into a concrete field type.
pub trait FieldValue: Sized {
    fn assign(target: &mut Self, value: &Value, key_path: &str) -> Result<(), TagError>;
}

impl FieldValue for String {
    fn assign(target: &mut Self, value: &Value, key_path: &str) -> Result<(), TagError> {
        match value {
            Value::String(v) => {
                *target = v.clone();
                Ok(())
            }
            other => Err(assign_error(key_path, "string", other)),
        }
    }
}

impl FieldValue for bool {
    fn assign(target: &mut Self, value: &Value, key_path: &str) -> Result<(), TagError> {
        match value {
            Value::Bool(v) => {
                *target = *v;
                Ok(())
            }
            other => Err(assign_error(key_path, "bool", other)),
        }
    }
}

macro_rules! impl_field_value_int {
    ($($t:ty),*) => {
        $(
            impl FieldValue for $t {
                fn assign(
                    target: &mut Self,
                    value: &Value,
                    key_path: &str,
                ) -> Result<(), TagError> {
                    match value {
                        Value::Int(v) => {
                            *target = (*v)
                                .try_into()
                                .map_err(|_| assign_error(key_path, stringify!($t), value))?;
                            Ok(())
                        }
                        Value::Uint(v) => {
                            *target = (*v)
                                .try_into()
                                .map_err(|_| assign_error(key_path, stringify!($t), value))?;
                            Ok(())
                        }
                        Value::Float(v) => {
                            // Truncates toward zero; values outside the
                            // destination width are an error, not a wrap.
                            let truncated = v.trunc();
                            if truncated >= <$t>::MIN as f64 && truncated <= <$t>::MAX as f64 {
                                *target = truncated as $t;
                                Ok(())
                            } else {
                                Err(assign_error(key_path, stringify!($t), value))
                            }
                        }
                        other => Err(assign_error(key_path, stringify!($t), other)),
                    }
                }
            }
        )*
    };
}

impl_field_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_field_value_float {
    ($($t:ty),*) => {
        $(
            impl FieldValue for $t {
                fn assign(
                    target: &mut Self,
                    value: &Value,
                    key_path: &str,
                ) -> Result<(), TagError> {
                    match value {
                        Value::Float(v) => {
                            *target = *v as $t;
                            Ok(())
                        }
                        Value::Int(v) => {
                            *target = *v as $t;
                            Ok(())
                        }
                        Value::Uint(v) => {
                            *target = *v as $t;
                            Ok(())
                        }
                        other => Err(assign_error(key_path, stringify!($t), other)),
                    }
                }
            }
        )*
    };
}

impl_field_value_float!(f32, f64);

impl FieldValue for Value {
    fn assign(target: &mut Self, value: &Value, _key_path: &str) -> Result<(), TagError> {
        *target = value.clone();
        Ok(())
    }
}

impl<T: FieldValue + Default> FieldValue for Vec<T> {
    fn assign(target: &mut Self, value: &Value, key_path: &str) -> Result<(), TagError> {
        match value {
            Value::Array(items) => {
                for item in items {
                    let mut element = T::default();
                    T::assign(&mut element, item, key_path)?;
                    target.push(element);
                }
                Ok(())
            }
            other => Err(assign_error(key_path, "array", other)),
        }
    }
}

fn assign_error(key_path: &str, expected: &'static str, value: &Value) -> TagError {
    TagError::Assign {
        path: key_path.to_string(),
        expected,
        kind: value.kind(),
    }
}
