//! JSON document model for webcore.
//!
//! This crate provides:
//! - `JsonValue`: a closed tagged union over JSON data with total,
//!   `Option`-returning coercions
//! - `JsonObject` / `JsonArray`: insertion-ordered containers whose equality
//!   and hashing follow their canonical serialization
//! - `JsonPath`: path expressions for querying and mutating documents in place
//! - `validate`: structural validators that accumulate located errors
//!
//! # Example
//!
//! ```rust
//! use webcore_json::{jpath, JsonValue};
//!
//! let mut doc = JsonValue::parse(r#"{"users": [{"name": "Ada"}, {"name": "Grace"}]}"#).unwrap();
//! assert_eq!(jpath!("$.users[-1].name").read_str(&doc), Some("Grace"));
//!
//! jpath!("$.users[*]").put(&mut doc, "active", JsonValue::from(true)).unwrap();
//! assert_eq!(jpath!("$..active").query(&doc).len(), 2);
//! ```

mod array;
mod error;
mod number;
mod object;
mod path;
mod query;
mod serialize;
pub mod validate;
mod value;

pub use array::JsonArray;
pub use error::JsonError;
pub use number::Number;
pub use object::JsonObject;
pub use path::{JsonPath, Location, Segment, Step};
pub use serialize::Strict;
pub use value::{JsonType, JsonValue};
