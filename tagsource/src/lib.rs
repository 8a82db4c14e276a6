//! Struct-tag driven decoding from pluggable key/value sources
//!
//! `tagsource` populates typed records from any key/value backend (JSON-like
//! trees, the process environment, or an arbitrary getter function) driven by
//! a declarative tag mini-grammar on each field.
//!
//! A single `#[tag("...")]` attribute per field carries renaming, presence
//! requirements, defaults, environment fallback, numeric/length bounds, enum
//! membership, regular-expression matching, and sequence splitting. The
//! decoder recurses through nested records, sequences of records, and maps,
//! addressing the backend with dotted key paths like `redis.port` or
//! `users.0.name`.
//!
//! # Features
//!
//! - **Declarative**: one derive, one attribute, no manual wiring
//! - **Pluggable backends**: implement [`DataSource`] or use the built-in
//!   [`MapSource`], [`EnvSource`], and [`FnSource`] adapters
//! - **Validation**: `required`, `min`/`max`, `enum`, `regexp` checked at
//!   decode time with stable, matchable error messages
//! - **Coercion**: backends may hand back strings; fields get real `i64`s,
//!   `bool`s, `f64`s, and split sequences
//!
//! # Tag grammar
//!
//! A tag is a comma-separated list of segments:
//!
//! - a bare segment is the field's lookup alias (`app_name`)
//! - `required` / `omitempty` control presence checking
//! - `default=V` supplies a fallback value
//! - `env=NAME` reads the environment variable `NAME` when the value is
//!   still empty after defaulting; a set variable overrides the default
//! - `min=N` / `max=N` bound numeric values, or character counts for strings
//! - `enum=A|B|C` restricts to a fixed literal set
//! - `regexp=/PATTERN/` requires a full match
//! - `seperator=C` changes the splitter for sequence fields (default `,`)
//!
//! # Example
//!
//! ```rust
//! use tagsource::{MapSource, TagDecode, Value};
//!
//! #[derive(Debug, Default, TagDecode)]
//! struct Redis {
//!     #[tag("ip,default=127.0.0.1")]
//!     ip: String,
//!     #[tag("port,default=6379")]
//!     port: i64,
//! }
//!
//! #[derive(Debug, Default, TagDecode)]
//! struct Config {
//!     #[tag("app_name,required")]
//!     app_name: String,
//!     #[tag("age,min=3,max=18")]
//!     age: i64,
//!     #[tag("redis")]
//!     redis: Redis,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let source = MapSource::new(Value::from(serde_json::json!({
//!     "app_name": "gozoox",
//!     "age": "12",
//!     "redis": { "port": "6739" },
//! })));
//!
//! let config = Config::decode_from(source)?;
//! assert_eq!(config.app_name, "gozoox");
//! assert_eq!(config.age, 12);
//! assert_eq!(config.redis.ip, "127.0.0.1");
//! assert_eq!(config.redis.port, 6739);
//! # Ok(())
//! # }
//! ```

mod attribute;
mod datasource;
mod decoder;
mod error;
mod value;

pub use attribute::{Attribute, TypeTag};
pub use datasource::{DataSource, EnvSource, FnSource, MapSource};
pub use decoder::{Decoder, FieldValue, TagDecode};
pub use error::TagError;
pub use value::Value;

pub use tagsource_derive::TagDecode;
