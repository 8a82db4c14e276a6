//! Error types for tag parsing, validation, and decoding.

/// Errors surfaced by [`Decoder::decode`] and the attribute engine.
///
/// Four families, all reported synchronously and never retried:
/// - construction errors: the tag string itself is malformed
///   ([`InvalidBound`], [`EmptySeparator`])
/// - validation errors: the resolved value violates a declared constraint,
///   identified by the field's full key path
/// - coercion errors: the accepted string cannot be parsed into the declared
///   type, identified by the field's native name
/// - structural errors: the decoder was pointed at a shape it cannot assign
///
/// The first failure anywhere in the recursive walk aborts the whole decode;
/// callers see exactly one failing field per call. Several message texts are
/// part of the wire contract and matched on by callers; do not reword them.
///
/// [`Decoder::decode`]: crate::Decoder::decode
/// [`InvalidBound`]: TagError::InvalidBound
/// [`EmptySeparator`]: TagError::EmptySeparator
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// A `required` field resolved to nothing after defaulting and
    /// environment fallback.
    #[error("{path} is required")]
    Required {
        /// Full key path of the failing field
        path: String,
    },

    /// An enum constraint was declared and the value resolved empty; empty
    /// never satisfies an enum.
    #[error("{path} must be in enum({allowed}), but empty")]
    EnumEmpty { path: String, allowed: String },

    /// The value is not one of the declared enum literals.
    #[error("{path}(value: {value})) is not in enum({allowed})")]
    EnumMismatch {
        path: String,
        value: String,
        allowed: String,
    },

    /// The value is outside the declared `min`/`max` bounds. `got` carries
    /// the offending measurement: `empty`, a string length, or a number,
    /// optionally followed by `(value: ...)`.
    #[error("{path} must be in range({min}, {max}), but {got}")]
    Range {
        path: String,
        min: String,
        max: String,
        got: String,
    },

    /// Range bounds were declared on a numeric field but the value does not
    /// parse as a number at all.
    #[error("{path} is invalid with min({min}) and max({max})")]
    Bounds { path: String, min: f64, max: f64 },

    /// A regexp constraint was declared and the value resolved empty.
    #[error("{path} must be matched with regexp({pattern}), but empty")]
    PatternEmpty { path: String, pattern: String },

    /// The value does not fully match the declared pattern.
    #[error("{path} must be matched with regexp({pattern})")]
    PatternMismatch { path: String, pattern: String },

    /// The declared pattern failed to compile; surfaced verbatim.
    #[error(transparent)]
    Pattern(#[from] regex::Error),

    /// The accepted string could not be parsed into the declared type.
    /// `key` is the field's native name, not the full path.
    #[error("{key} is not {expected}")]
    Coerce { key: String, expected: &'static str },

    /// The data source produced a boolean for a field not declared `bool`.
    #[error("type of {path} is not bool")]
    BoolSource { path: String },

    /// The resolved value's dynamic kind cannot be assigned to the field's
    /// static type.
    #[error("cannot assign {kind} to {expected} at {path}")]
    Assign {
        path: String,
        expected: &'static str,
        kind: &'static str,
    },

    /// The field's structural kind is not supported by the decoder.
    #[error("type({kind}) is not supported at {path}")]
    Unsupported { kind: &'static str, path: String },

    /// A sequence element failed to decode as a nested record; wraps the
    /// underlying error with the sequence's key path.
    #[error("{path} is not slice({source})")]
    Slice {
        path: String,
        #[source]
        source: Box<TagError>,
    },

    /// A `min=`/`max=` tag segment did not parse as a number.
    #[error("tag {bound}={value} is not a number")]
    InvalidBound { bound: &'static str, value: String },

    /// A `seperator=` tag segment was given without a value.
    #[error("seperator must have a value")]
    EmptySeparator,
}
