//! Format binders for webcore documents.
//!
//! This layer moves documents across representations. It adds:
//! - `Binder`: decode bytes into a `JsonValue` and encode it back
//! - `JsonBinder`: compact, pretty or strict JSON
//! - `PropertiesBinder`: flattened `a.b[0]=value` lines
//! - `MultiBinder`: routing by `Format`
//! - `from_value` / `to_value`: serde bridges to Rust types
//!
//! # Example
//!
//! ```rust
//! use webcore_binder::{Binder, Bytes, Format, MultiBinder};
//!
//! let binder = MultiBinder::default();
//! let doc = binder
//!     .decode(&Bytes::from_static(br#"{"db":{"port":5432}}"#), &Format::JSON)
//!     .unwrap();
//! let props = binder.encode(&doc, &Format::PROPERTIES).unwrap();
//! assert_eq!(&props[..], b"db.port=5432\n");
//! ```

pub use bytes::Bytes;

mod binder;
mod convert;
mod format;
mod properties;

pub use binder::{Binder, JsonBinder, JsonStyle, MultiBinder};
pub use convert::{from_value, to_value, TypedBinder, TypedQuery};
pub use format::Format;
pub use properties::PropertiesBinder;

// Re-export document types for convenience
pub use webcore_json::{JsonError, JsonValue};
