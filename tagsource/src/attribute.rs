//! Per-field constraint parsing, validation, and type coercion.

use regex::Regex;

use crate::datasource::DataSource;
use crate::error::TagError;
use crate::value::Value;

/// Semantic type tag of a field, driving validation and string coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    String,
    Bool,
    /// Any integer width, signed or unsigned. Strings parse as base-10
    /// signed 64-bit; conversion to the field's exact width and signedness
    /// happens at assignment time, not here.
    Int,
    Float,
    /// `Vec<String>`, split on the separator.
    StrList,
    /// Integer sequence, split then per-element parsed.
    IntList,
    /// Float sequence, split then per-element parsed.
    FloatList,
    /// Nested record marker: no scalar validation, the decoder recurses.
    Struct,
    /// Permissive fallback for types the engine does not validate (maps and
    /// unclassified shapes). String coercion yields `Null` rather than an
    /// error; container raw values ride through verbatim for the decoder.
    Other,
}

/// One field's parsed constraint set and resolved value.
///
/// Constructed fresh for every field on every decode pass from the field's
/// native name, its [`TypeTag`], the enclosing record's key-path prefix, and
/// the tag string. Construction fails fast on malformed `min`/`max` bounds
/// and an empty `seperator=` value.
///
/// # Tag grammar
///
/// A tag string is a comma-separated list of segments. The first bare
/// segment that is neither a recognized flag nor of `key=value` form is the
/// alias. Recognized segments:
///
/// - `required` / `omitempty`
/// - `default=V`
/// - `env=NAME`: environment fallback. Applied after the default: the
///   default is assigned first, then the environment is consulted and
///   overwrites it when the variable exists. This ordering is deliberate,
///   documented behavior.
/// - `min=N` / `max=N`: value bounds for numerics, character-length bounds
///   for strings
/// - `enum=A|B|C`
/// - `regexp=/PATTERN/`: the value must fully match (delimiting slashes
///   stripped)
/// - `seperator=C`: overrides the default `,` splitter for sequence types
///   (the original wire format's spelling is kept)
///
/// Unknown segments are ignored.
#[derive(Debug)]
pub struct Attribute {
    data_key: String,
    key_path_parent: String,
    alias: String,
    type_tag: TypeTag,
    required: bool,
    default: Option<String>,
    env: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    enum_values: Option<Vec<String>>,
    pattern: Option<String>,
    separator: String,
    value: Value,
    value_set: bool,
}

impl Attribute {
    /// Parse a tag string into an attribute for the field `data_key`.
    pub fn new(
        data_key: &str,
        type_tag: TypeTag,
        key_path_parent: &str,
        tag: &str,
    ) -> Result<Self, TagError> {
        let mut alias = String::new();
        let mut required = false;
        let mut default = None;
        let mut env = None;
        let mut min = None;
        let mut max = None;
        let mut enum_values = None;
        let mut pattern = None;
        let mut separator = String::from(",");

        for segment in tag.split(',') {
            if segment.is_empty() {
                continue;
            }

            if segment == "required" {
                required = true;
            } else if segment == "omitempty" {
                required = false;
            } else if let Some((key, value)) = segment.split_once('=') {
                match key {
                    "default" => default = Some(value.to_string()),
                    "env" => env = Some(value.to_string()),
                    "min" => min = Some(parse_bound("min", value)?),
                    "max" => max = Some(parse_bound("max", value)?),
                    "enum" => {
                        enum_values = Some(value.split('|').map(str::to_string).collect());
                    }
                    "regexp" => {
                        let stripped = value
                            .strip_prefix('/')
                            .and_then(|inner| inner.strip_suffix('/'))
                            .unwrap_or(value);
                        pattern = Some(stripped.to_string());
                    }
                    "seperator" => {
                        if value.is_empty() {
                            return Err(TagError::EmptySeparator);
                        }
                        separator = value.to_string();
                    }
                    _ => {}
                }
            } else if alias.is_empty() {
                alias = segment.to_string();
            }
        }

        Ok(Self {
            data_key: data_key.to_string(),
            key_path_parent: key_path_parent.to_string(),
            alias,
            type_tag,
            required,
            default,
            env,
            min,
            max,
            enum_values,
            pattern,
            separator,
            value: Value::Null,
            value_set: false,
        })
    }

    /// The field's native name, used in coercion error messages.
    pub fn data_key(&self) -> &str {
        &self.data_key
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Dotted lookup path: `key_path_parent + "." + (alias or data_key)`
    /// when the parent prefix is non-empty, else `alias or data_key`.
    ///
    /// This path is both the data-source lookup key and the identifier in
    /// every validation error message.
    pub fn key_path(&self) -> String {
        let key = if self.alias.is_empty() {
            &self.data_key
        } else {
            &self.alias
        };

        if self.key_path_parent.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", self.key_path_parent, key)
        }
    }

    /// The resolved, type-corrected value.
    ///
    /// # Panics
    ///
    /// Reading the value before [`set_value`] has run is a programming
    /// error and fails loudly.
    ///
    /// [`set_value`]: Attribute::set_value
    pub fn value(&self) -> &Value {
        if !self.value_set {
            panic!("attribute value read before set_value");
        }
        &self.value
    }

    /// Resolve, validate, and coerce a raw value from the data source.
    ///
    /// `environ` is the lookup used for `env=` fallback; injecting it keeps
    /// resolution deterministic and testable.
    pub fn set_value(
        &mut self,
        raw: Option<Value>,
        environ: &dyn DataSource,
    ) -> Result<(), TagError> {
        self.value_set = true;
        self.value = Value::Null;

        let value = match raw {
            None | Some(Value::Null) => {
                if self.type_tag == TypeTag::Struct {
                    // Nested records are handled structurally, not as scalars.
                    Value::Null
                } else {
                    // Absence resolves through the string path's empty-value
                    // branch, where default and env fallback apply in order.
                    Value::String(String::new())
                }
            }
            Some(value) => value,
        };

        match value {
            Value::String(v) => self.set_string(v, environ),
            Value::Bool(v) => self.set_bool(v),
            Value::Int(v) => self.set_int(v),
            Value::Uint(v) => self.set_uint(v),
            Value::Float(v) => self.set_float(v),
            // Containers (and a struct marker's Null) are stored verbatim
            // without validation; the decoder walks them.
            other => {
                self.value = other;
                Ok(())
            }
        }
    }

    fn set_string(&mut self, raw: String, environ: &dyn DataSource) -> Result<(), TagError> {
        if self.type_tag == TypeTag::Struct {
            return Ok(());
        }

        let mut value = raw;
        if value.is_empty() {
            if let Some(default) = &self.default {
                value = default.clone();
            }
            if let Some(name) = &self.env {
                if let Some(Value::String(from_env)) = environ.get(name) {
                    value = from_env;
                }
            }
        }

        if value.is_empty() {
            if self.required {
                return Err(TagError::Required {
                    path: self.key_path(),
                });
            }
            if let Some(allowed) = &self.enum_values {
                return Err(TagError::EnumEmpty {
                    path: self.key_path(),
                    allowed: allowed.join("|"),
                });
            }
            if self.min.is_some() || self.max.is_some() {
                match self.type_tag {
                    TypeTag::String | TypeTag::Int | TypeTag::Float => {
                        return Err(self.range_error("empty".to_string()));
                    }
                    _ => {}
                }
            }
            if let Some(pattern) = &self.pattern {
                return Err(TagError::PatternEmpty {
                    path: self.key_path(),
                    pattern: pattern.clone(),
                });
            }
        } else {
            if let Some(allowed) = &self.enum_values {
                if !allowed.iter().any(|candidate| candidate == &value) {
                    return Err(TagError::EnumMismatch {
                        path: self.key_path(),
                        value,
                        allowed: allowed.join("|"),
                    });
                }
            }

            if self.min.is_some() || self.max.is_some() {
                match self.type_tag {
                    TypeTag::String => {
                        let length = value.chars().count();
                        if self.below_min(length as f64) || self.above_max(length as f64) {
                            return Err(
                                self.range_error(format!("{}(value: {})", length, value))
                            );
                        }
                    }
                    TypeTag::Int | TypeTag::Float => {
                        let number: f64 = value.parse().map_err(|_| TagError::Bounds {
                            path: self.key_path(),
                            min: self.min.unwrap_or(0.0),
                            max: self.max.unwrap_or(0.0),
                        })?;
                        if self.below_min(number) || self.above_max(number) {
                            let got = if self.type_tag == TypeTag::Int {
                                format!("{}(value: {})", number as i64, value)
                            } else {
                                format!("{}(value: {})", number, value)
                            };
                            return Err(self.range_error(got));
                        }
                    }
                    _ => {}
                }
            }

            if let Some(pattern) = &self.pattern {
                let matcher = Regex::new(&format!("^(?:{})$", pattern))?;
                if !matcher.is_match(&value) {
                    return Err(TagError::PatternMismatch {
                        path: self.key_path(),
                        pattern: pattern.clone(),
                    });
                }
            }
        }

        self.coerce(value)
    }

    /// Final step of the string path: parse the accepted string into the
    /// declared shape.
    fn coerce(&mut self, value: String) -> Result<(), TagError> {
        self.value = match self.type_tag {
            TypeTag::String => Value::String(value),
            TypeTag::Float => {
                if value.is_empty() {
                    Value::Float(0.0)
                } else {
                    Value::Float(value.parse().map_err(|_| self.coerce_error("float"))?)
                }
            }
            TypeTag::Int => {
                if value.is_empty() {
                    Value::Int(0)
                } else {
                    Value::Int(value.parse().map_err(|_| self.coerce_error("int"))?)
                }
            }
            TypeTag::Bool => {
                if value.is_empty() {
                    Value::Bool(false)
                } else {
                    Value::Bool(parse_bool(&value).ok_or_else(|| self.coerce_error("bool"))?)
                }
            }
            TypeTag::StrList => {
                if value.is_empty() {
                    Value::Null
                } else {
                    Value::Array(
                        value
                            .split(self.separator.as_str())
                            .map(|part| Value::String(part.to_string()))
                            .collect(),
                    )
                }
            }
            TypeTag::IntList => {
                if value.is_empty() {
                    Value::Null
                } else {
                    let mut items = Vec::new();
                    for part in value.split(self.separator.as_str()) {
                        let parsed: i64 =
                            part.parse().map_err(|_| self.coerce_error("int"))?;
                        items.push(Value::Int(parsed));
                    }
                    Value::Array(items)
                }
            }
            TypeTag::FloatList => {
                if value.is_empty() {
                    Value::Null
                } else {
                    let mut items = Vec::new();
                    for part in value.split(self.separator.as_str()) {
                        let parsed: f64 =
                            part.parse().map_err(|_| self.coerce_error("float64"))?;
                        items.push(Value::Float(parsed));
                    }
                    Value::Array(items)
                }
            }
            // Struct never reaches coercion; Other is the permissive
            // fallback for unvalidated types.
            TypeTag::Struct | TypeTag::Other => Value::Null,
        };

        Ok(())
    }

    fn set_bool(&mut self, value: bool) -> Result<(), TagError> {
        if self.type_tag != TypeTag::Bool {
            return Err(TagError::BoolSource {
                path: self.key_path(),
            });
        }

        self.value = Value::Bool(value);
        Ok(())
    }

    fn set_int(&mut self, value: i64) -> Result<(), TagError> {
        self.check_numeric_range(value as f64, || value.to_string())?;
        self.value = Value::Int(value);
        Ok(())
    }

    fn set_uint(&mut self, value: u64) -> Result<(), TagError> {
        self.check_numeric_range(value as f64, || value.to_string())?;
        self.value = Value::Uint(value);
        Ok(())
    }

    fn set_float(&mut self, value: f64) -> Result<(), TagError> {
        self.check_numeric_range(value, || value.to_string())?;
        self.value = Value::Float(value);
        Ok(())
    }

    fn check_numeric_range(
        &self,
        number: f64,
        got: impl FnOnce() -> String,
    ) -> Result<(), TagError> {
        if self.min.is_none() && self.max.is_none() {
            return Ok(());
        }
        if self.below_min(number) || self.above_max(number) {
            return Err(self.range_error(got()));
        }
        Ok(())
    }

    fn below_min(&self, number: f64) -> bool {
        self.min.is_some_and(|min| number < min)
    }

    fn above_max(&self, number: f64) -> bool {
        self.max.is_some_and(|max| number > max)
    }

    fn range_error(&self, got: String) -> TagError {
        let min = self.min.unwrap_or(0.0);
        let max = self.max.unwrap_or(0.0);
        let (min, max) = if self.type_tag == TypeTag::Float {
            (min.to_string(), max.to_string())
        } else {
            ((min as i64).to_string(), (max as i64).to_string())
        };

        TagError::Range {
            path: self.key_path(),
            min,
            max,
            got,
        }
    }

    fn coerce_error(&self, expected: &'static str) -> TagError {
        TagError::Coerce {
            key: self.data_key.clone(),
            expected,
        }
    }
}

fn parse_bound(bound: &'static str, value: &str) -> Result<f64, TagError> {
    value.parse().map_err(|_| TagError::InvalidBound {
        bound,
        value: value.to_string(),
    })
}

/// Boolean literal parsing, accepting the same set as Go's `ParseBool`.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{FnSource, MapSource};
    use serde_json::json;

    fn no_env() -> impl DataSource {
        FnSource::new(|_: &str| None::<Value>)
    }

    fn set(attribute: &mut Attribute, raw: &str) -> Result<(), TagError> {
        attribute.set_value(Some(Value::String(raw.to_string())), &no_env())
    }

    #[test]
    fn test_empty_tag_falls_back_to_data_key() {
        let mut attribute = Attribute::new("AppName", TypeTag::String, "", "").unwrap();
        assert_eq!(attribute.key_path(), "AppName");

        set(&mut attribute, "").unwrap();
        assert_eq!(attribute.value(), &Value::String("".into()));

        set(&mut attribute, "gozoox").unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox".into()));
    }

    #[test]
    fn test_alias() {
        let attribute = Attribute::new("AppName", TypeTag::String, "", "app_name").unwrap();
        assert_eq!(attribute.key_path(), "app_name");
    }

    #[test]
    fn test_alias_skips_keywords() {
        let attribute =
            Attribute::new("AppName", TypeTag::String, "", "required,app_name").unwrap();
        assert_eq!(attribute.key_path(), "app_name");
    }

    #[test]
    fn test_key_path_with_parent() {
        let attribute = Attribute::new("port", TypeTag::Int, "redis", "port").unwrap();
        assert_eq!(attribute.key_path(), "redis.port");

        let attribute = Attribute::new("Port", TypeTag::Int, "config.redis", "").unwrap();
        assert_eq!(attribute.key_path(), "config.redis.Port");
    }

    #[test]
    fn test_omitempty_accepts_empty() {
        let mut attribute =
            Attribute::new("AppName", TypeTag::String, "", "app_name,omitempty").unwrap();

        set(&mut attribute, "").unwrap();
        assert_eq!(attribute.value(), &Value::String("".into()));
    }

    #[test]
    fn test_required() {
        let mut attribute =
            Attribute::new("AppName", TypeTag::String, "", "app_name,required").unwrap();

        let err = set(&mut attribute, "").unwrap_err();
        assert_eq!(err.to_string(), "app_name is required");
        assert!(attribute.value().is_null());

        set(&mut attribute, "gozoox").unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox".into()));
    }

    #[test]
    fn test_required_satisfied_by_default() {
        let mut attribute = Attribute::new(
            "AppName",
            TypeTag::String,
            "",
            "app_name,required,default=gozoox",
        )
        .unwrap();

        set(&mut attribute, "").unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox".into()));
    }

    #[test]
    fn test_default_value() {
        let mut attribute =
            Attribute::new("AppName", TypeTag::String, "", "app_name,default=gozoox").unwrap();

        set(&mut attribute, "").unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox".into()));

        set(&mut attribute, "gozoox2").unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox2".into()));
    }

    #[test]
    fn test_default_applies_to_absent_value() {
        let mut attribute =
            Attribute::new("AppName", TypeTag::String, "", "app_name,default=gozoox2").unwrap();

        attribute.set_value(None, &no_env()).unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox2".into()));
    }

    #[test]
    fn test_env_fallback() {
        let environ = MapSource::new(Value::from(json!({
            "APP_NAME": "app_name_from_env",
        })));
        let mut attribute =
            Attribute::new("AppName", TypeTag::String, "", "app_name,env=APP_NAME").unwrap();

        attribute
            .set_value(Some(Value::String("".into())), &environ)
            .unwrap();
        assert_eq!(attribute.value(), &Value::String("app_name_from_env".into()));
    }

    #[test]
    fn test_env_overrides_default() {
        // Documented order: default first, then env overwrites when set.
        let environ = MapSource::new(Value::from(json!({ "APP_NAME": "from_env" })));
        let mut attribute = Attribute::new(
            "AppName",
            TypeTag::String,
            "",
            "app_name,default=from_default,env=APP_NAME",
        )
        .unwrap();

        attribute.set_value(None, &environ).unwrap();
        assert_eq!(attribute.value(), &Value::String("from_env".into()));
    }

    #[test]
    fn test_env_unset_keeps_default() {
        let mut attribute = Attribute::new(
            "AppName",
            TypeTag::String,
            "",
            "app_name,default=from_default,env=APP_NAME_UNSET",
        )
        .unwrap();

        attribute.set_value(None, &no_env()).unwrap();
        assert_eq!(attribute.value(), &Value::String("from_default".into()));
    }

    #[test]
    fn test_enum_empty() {
        let mut attribute = Attribute::new(
            "AppName",
            TypeTag::String,
            "",
            "app_name,enum=gozoox|gozoox2",
        )
        .unwrap();

        let err = set(&mut attribute, "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "app_name must be in enum(gozoox|gozoox2), but empty"
        );
    }

    #[test]
    fn test_enum_membership() {
        let mut attribute = Attribute::new(
            "AppName",
            TypeTag::String,
            "",
            "app_name,enum=gozoox|gozoox2",
        )
        .unwrap();

        set(&mut attribute, "gozoox").unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox".into()));

        set(&mut attribute, "gozoox2").unwrap();
        assert_eq!(attribute.value(), &Value::String("gozoox2".into()));

        let err = set(&mut attribute, "gozoox3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "app_name(value: gozoox3)) is not in enum(gozoox|gozoox2)"
        );
    }

    #[test]
    fn test_string_min_max() {
        let mut attribute =
            Attribute::new("Password", TypeTag::String, "", "password,min=6,max=10").unwrap();
        assert_eq!(attribute.key_path(), "password");

        let err = set(&mut attribute, "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "password must be in range(6, 10), but empty"
        );
        assert!(attribute.value().is_null());

        let err = set(&mut attribute, "a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "password must be in range(6, 10), but 1(value: a)"
        );

        let err = set(&mut attribute, "1234567890a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "password must be in range(6, 10), but 11(value: 1234567890a)"
        );

        set(&mut attribute, "1234567890").unwrap();
        assert_eq!(attribute.value(), &Value::String("1234567890".into()));

        set(&mut attribute, "123456").unwrap();
        assert_eq!(attribute.value(), &Value::String("123456".into()));
    }

    #[test]
    fn test_number_min_max() {
        let mut attribute = Attribute::new("Age", TypeTag::Int, "", "age,min=3,max=18").unwrap();
        assert_eq!(attribute.key_path(), "age");

        let err = set(&mut attribute, "").unwrap_err();
        assert_eq!(err.to_string(), "age must be in range(3, 18), but empty");
        assert!(attribute.value().is_null());

        let err = set(&mut attribute, "1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "age must be in range(3, 18), but 1(value: 1)"
        );

        let err = set(&mut attribute, "19").unwrap_err();
        assert_eq!(
            err.to_string(),
            "age must be in range(3, 18), but 19(value: 19)"
        );

        set(&mut attribute, "18").unwrap();
        assert_eq!(attribute.value(), &Value::Int(18));

        set(&mut attribute, "3").unwrap();
        assert_eq!(attribute.value(), &Value::Int(3));

        set(&mut attribute, "12").unwrap();
        assert_eq!(attribute.value(), &Value::Int(12));
    }

    #[test]
    fn test_number_min_max_unparsable() {
        let mut attribute = Attribute::new("Age", TypeTag::Int, "", "age,min=3,max=18").unwrap();

        let err = set(&mut attribute, "abc").unwrap_err();
        assert_eq!(err.to_string(), "age is invalid with min(3) and max(18)");
    }

    #[test]
    fn test_typed_int_range() {
        let mut attribute = Attribute::new("Age", TypeTag::Int, "", "age,min=3,max=18").unwrap();

        let err = attribute
            .set_value(Some(Value::Int(19)), &no_env())
            .unwrap_err();
        assert_eq!(err.to_string(), "age must be in range(3, 18), but 19");

        attribute.set_value(Some(Value::Int(18)), &no_env()).unwrap();
        assert_eq!(attribute.value(), &Value::Int(18));
    }

    #[test]
    fn test_typed_setters_skip_string_checks() {
        // enum/regexp/length are literal-string constraints; already-typed
        // raw values bypass them.
        let mut attribute =
            Attribute::new("Age", TypeTag::Int, "", "age,enum=1|2").unwrap();

        attribute.set_value(Some(Value::Int(9)), &no_env()).unwrap();
        assert_eq!(attribute.value(), &Value::Int(9));
    }

    #[test]
    fn test_bool_source_type_guard() {
        let mut attribute = Attribute::new("Debug", TypeTag::String, "", "debug").unwrap();

        let err = attribute
            .set_value(Some(Value::Bool(true)), &no_env())
            .unwrap_err();
        assert_eq!(err.to_string(), "type of debug is not bool");
    }

    #[test]
    fn test_regexp() {
        let mut attribute = Attribute::new(
            "Email",
            TypeTag::String,
            "",
            "email,regexp=/^[a-zA-Z0-9_-]+@[a-zA-Z0-9_-]+(\\.[a-zA-Z0-9_-]+)+$/",
        )
        .unwrap();
        assert_eq!(attribute.key_path(), "email");

        let err = set(&mut attribute, "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "email must be matched with regexp(^[a-zA-Z0-9_-]+@[a-zA-Z0-9_-]+(\\.[a-zA-Z0-9_-]+)+$), but empty"
        );
        assert!(attribute.value().is_null());

        set(&mut attribute, "tobewhatwewant@gmail.com").unwrap();
        assert_eq!(
            attribute.value(),
            &Value::String("tobewhatwewant@gmail.com".into())
        );

        let err = set(&mut attribute, "not-an-email").unwrap_err();
        assert!(err.to_string().starts_with("email must be matched with regexp("));
    }

    #[test]
    fn test_regexp_is_full_match() {
        let mut attribute =
            Attribute::new("Code", TypeTag::String, "", "code,regexp=/[0-9]+/").unwrap();

        set(&mut attribute, "123").unwrap();

        let err = set(&mut attribute, "a123b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "code must be matched with regexp([0-9]+)"
        );
    }

    #[test]
    fn test_string_slice() {
        let mut attribute = Attribute::new("Tags", TypeTag::StrList, "", "tags").unwrap();
        assert_eq!(attribute.key_path(), "tags");

        set(&mut attribute, "a,b,c").unwrap();
        assert_eq!(
            attribute.value(),
            &Value::Array(vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String("c".into()),
            ])
        );
    }

    #[test]
    fn test_int_slice() {
        let mut attribute = Attribute::new("Tags", TypeTag::IntList, "", "tags").unwrap();

        set(&mut attribute, "1,2,3").unwrap();
        assert_eq!(
            attribute.value(),
            &Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );

        let err = set(&mut attribute, "1,x,3").unwrap_err();
        assert_eq!(err.to_string(), "Tags is not int");
    }

    #[test]
    fn test_float_slice() {
        let mut attribute = Attribute::new("Tags", TypeTag::FloatList, "", "tags").unwrap();

        set(&mut attribute, "1.1,2.2,3.3").unwrap();
        assert_eq!(
            attribute.value(),
            &Value::Array(vec![
                Value::Float(1.1),
                Value::Float(2.2),
                Value::Float(3.3),
            ])
        );

        let err = set(&mut attribute, "1.1,x").unwrap_err();
        assert_eq!(err.to_string(), "Tags is not float64");
    }

    #[test]
    fn test_string_slice_with_custom_seperator() {
        let mut attribute =
            Attribute::new("Tags", TypeTag::StrList, "", "tags,seperator=;").unwrap();

        set(&mut attribute, "a;b;c").unwrap();
        assert_eq!(
            attribute.value(),
            &Value::Array(vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String("c".into()),
            ])
        );
    }

    #[test]
    fn test_empty_slice_value_resolves_null() {
        let mut attribute = Attribute::new("Tags", TypeTag::StrList, "", "tags").unwrap();

        set(&mut attribute, "").unwrap();
        assert!(attribute.value().is_null());
    }

    #[test]
    fn test_bool_coercion() {
        let mut attribute = Attribute::new("Debug", TypeTag::Bool, "", "debug").unwrap();

        for literal in ["1", "t", "T", "TRUE", "true", "True"] {
            set(&mut attribute, literal).unwrap();
            assert_eq!(attribute.value(), &Value::Bool(true), "literal {literal}");
        }
        for literal in ["0", "f", "F", "FALSE", "false", "False"] {
            set(&mut attribute, literal).unwrap();
            assert_eq!(attribute.value(), &Value::Bool(false), "literal {literal}");
        }

        let err = set(&mut attribute, "yes").unwrap_err();
        assert_eq!(err.to_string(), "Debug is not bool");
    }

    #[test]
    fn test_int_coercion_failure_names_field() {
        let mut attribute = Attribute::new("Port", TypeTag::Int, "redis", "port").unwrap();

        let err = set(&mut attribute, "not-a-port").unwrap_err();
        assert_eq!(err.to_string(), "Port is not int");
    }

    #[test]
    fn test_float_coercion() {
        let mut attribute = Attribute::new("Ratio", TypeTag::Float, "", "ratio").unwrap();

        set(&mut attribute, "0.5").unwrap();
        assert_eq!(attribute.value(), &Value::Float(0.5));

        let err = set(&mut attribute, "x").unwrap_err();
        assert_eq!(err.to_string(), "Ratio is not float");
    }

    #[test]
    fn test_unrecognized_type_resolves_null() {
        let mut attribute = Attribute::new("Extra", TypeTag::Other, "", "extra").unwrap();

        set(&mut attribute, "anything").unwrap();
        assert!(attribute.value().is_null());
    }

    #[test]
    fn test_struct_marker_skips_validation() {
        let mut attribute =
            Attribute::new("Redis", TypeTag::Struct, "", "redis,required").unwrap();

        // Absence of a nested record is handled structurally by the decoder.
        attribute.set_value(None, &no_env()).unwrap();
        assert!(attribute.value().is_null());
    }

    #[test]
    fn test_container_raw_stored_verbatim() {
        let mut attribute = Attribute::new("Redis", TypeTag::Struct, "", "redis").unwrap();
        let raw = Value::from(serde_json::json!({ "ip": "127.0.0.1" }));

        attribute.set_value(Some(raw.clone()), &no_env()).unwrap();
        assert_eq!(attribute.value(), &raw);
    }

    #[test]
    fn test_malformed_bound_fails_construction() {
        let err = Attribute::new("Age", TypeTag::Int, "", "age,min=abc").unwrap_err();
        assert_eq!(err.to_string(), "tag min=abc is not a number");

        let err = Attribute::new("Age", TypeTag::Int, "", "age,max=").unwrap_err();
        assert_eq!(err.to_string(), "tag max= is not a number");
    }

    #[test]
    fn test_empty_seperator_fails_construction() {
        let err = Attribute::new("Tags", TypeTag::StrList, "", "tags,seperator=").unwrap_err();
        assert_eq!(err.to_string(), "seperator must have a value");
    }

    #[test]
    fn test_unknown_segments_ignored() {
        let attribute =
            Attribute::new("AppName", TypeTag::String, "", "app_name,nonsense=1,extra").unwrap();
        assert_eq!(attribute.key_path(), "app_name");
    }

    #[test]
    #[should_panic(expected = "attribute value read before set_value")]
    fn test_value_before_set_panics() {
        let attribute = Attribute::new("AppName", TypeTag::String, "", "").unwrap();
        let _ = attribute.value();
    }
}
