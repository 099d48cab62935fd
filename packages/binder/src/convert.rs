//! Conversions between documents and serde types.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use webcore_json::{JsonError, JsonPath, JsonValue};

use crate::{Binder, Format};

/// Convert a document to a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: JsonValue) -> Result<T, JsonError> {
    serde_json::from_value(serde_json::Value::from(value)).map_err(|e| JsonError::Decode {
        format: Format::VALUE.to_string(),
        message: e.to_string(),
    })
}

/// Convert a Rust type to a document via serde.
pub fn to_value<T: Serialize>(data: &T) -> Result<JsonValue, JsonError> {
    serde_json::to_value(data)
        .map(JsonValue::from)
        .map_err(|e| JsonError::Encode {
            format: Format::VALUE.to_string(),
            message: e.to_string(),
        })
}

/// Extension trait for typed path reads.
///
/// Implemented for [`JsonPath`]; reads the first match and deserializes it.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use webcore_binder::TypedQuery;
/// use webcore_json::{jpath, JsonValue};
///
/// #[derive(Deserialize)]
/// struct Pool {
///     size: u32,
/// }
///
/// let doc = JsonValue::parse(r#"{"db": {"pool": {"size": 8}}}"#).unwrap();
/// let pool: Pool = jpath!("$.db.pool").read_as(&doc).unwrap().unwrap();
/// assert_eq!(pool.size, 8);
/// ```
pub trait TypedQuery {
    /// Deserialize the first match, or `None` when nothing matches.
    fn read_as<T: DeserializeOwned>(&self, doc: &JsonValue) -> Result<Option<T>, JsonError>;

    /// Serialize `data` and write it at every match.
    fn write_as<T: Serialize>(&self, doc: &mut JsonValue, data: &T) -> Result<usize, JsonError>;
}

impl TypedQuery for JsonPath {
    fn read_as<T: DeserializeOwned>(&self, doc: &JsonValue) -> Result<Option<T>, JsonError> {
        self.query_first(doc)
            .map(|value| from_value(value.clone()))
            .transpose()
    }

    fn write_as<T: Serialize>(&self, doc: &mut JsonValue, data: &T) -> Result<usize, JsonError> {
        self.set(doc, to_value(data)?)
    }
}

/// Extension trait for binding Rust types directly to bytes.
///
/// This trait is automatically implemented for all `Binder` implementations.
pub trait TypedBinder: Binder {
    /// Decode bytes and deserialize the document into a Rust type.
    fn decode_as<T: DeserializeOwned>(&self, bytes: &Bytes, format: &Format) -> Result<T, JsonError> {
        from_value(self.decode(bytes, format)?)
    }

    /// Serialize a Rust type and encode the document.
    fn encode_as<T: Serialize>(&self, data: &T, format: &Format) -> Result<Bytes, JsonError> {
        self.encode(&to_value(data)?, format)
    }
}

impl<B: Binder + ?Sized> TypedBinder for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonBinder, PropertiesBinder};
    use serde::Deserialize;
    use webcore_json::jpath;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestStruct {
        name: String,
        age: u32,
        active: bool,
    }

    fn alice() -> TestStruct {
        TestStruct {
            name: "Alice".to_string(),
            age: 30,
            active: true,
        }
    }

    #[test]
    fn struct_through_document() {
        let value = to_value(&alice()).unwrap();
        assert_eq!(value.get("age").and_then(JsonValue::as_i32), Some(30));
        let recovered: TestStruct = from_value(value).unwrap();
        assert_eq!(recovered, alice());
    }

    #[test]
    fn from_value_reports_shape_errors() {
        let result: Result<TestStruct, _> = from_value(JsonValue::from("nope"));
        assert!(matches!(result, Err(JsonError::Decode { .. })));
    }

    #[test]
    fn typed_path_reads() {
        let doc = JsonValue::parse(r#"{"users":[{"name":"Alice","age":30,"active":true}]}"#).unwrap();
        let user: Option<TestStruct> = jpath!("$.users[0]").read_as(&doc).unwrap();
        assert_eq!(user, Some(alice()));

        let missing: Option<TestStruct> = jpath!("$.users[5]").read_as(&doc).unwrap();
        assert!(missing.is_none());

        let age: Option<u32> = jpath!("$.users[0].age").read_as(&doc).unwrap();
        assert_eq!(age, Some(30));
    }

    #[test]
    fn typed_path_writes() {
        let mut doc = JsonValue::parse(r#"{"users":[]}"#).unwrap();
        jpath!("$.users[0]").write_as(&mut doc, &alice()).unwrap();
        assert_eq!(
            doc.to_string(),
            r#"{"users":[{"name":"Alice","age":30,"active":true}]}"#
        );
    }

    #[test]
    fn typed_binder_roundtrip() {
        let bytes = JsonBinder::default().encode_as(&alice(), &Format::JSON).unwrap();
        let back: TestStruct = JsonBinder::default().decode_as(&bytes, &Format::JSON).unwrap();
        assert_eq!(back, alice());
    }

    #[test]
    fn properties_strings_do_not_coerce() {
        let bytes = PropertiesBinder.encode_as(&alice(), &Format::PROPERTIES).unwrap();
        assert_eq!(&bytes[..], b"name=Alice\nage=30\nactive=true\n");

        // Every properties leaf decodes as a string.
        let result: Result<TestStruct, _> = PropertiesBinder.decode_as(&bytes, &Format::PROPERTIES);
        assert!(result.is_err());
    }
}
