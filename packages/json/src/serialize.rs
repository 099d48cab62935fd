//! Serde integration, text rendering and parsing.
//!
//! The canonical form of a document is its compact rendering with object
//! entries in insertion order. Container equality and hashing are defined on
//! that form.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{JsonArray, JsonError, JsonObject, JsonValue, Number};

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Int(i) => serializer.serialize_i64(*i),
            Number::UInt(u) => serializer.serialize_u64(*u),
            Number::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Number::Float(_) => serializer.serialize_unit(),
        }
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(n) => n.serialize(serializer),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(a) => a.serialize(serializer),
            JsonValue::Object(o) => o.serialize(serializer),
        }
    }
}

impl Serialize for JsonArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl Serialize for JsonObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Serializes a document in strict mode.
///
/// Integers outside the 32-bit range are written as doubles, which is what
/// consumers limited to JavaScript numbers and `int` fields expect.
pub struct Strict<'a>(pub &'a JsonValue);

impl Serialize for Strict<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            JsonValue::Number(n) => n.strict().serialize(serializer),
            JsonValue::Array(a) => {
                let mut seq = serializer.serialize_seq(Some(a.len()))?;
                for item in a {
                    seq.serialize_element(&Strict(item))?;
                }
                seq.end()
            }
            JsonValue::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.len()))?;
                for (k, v) in o {
                    map.serialize_entry(k, &Strict(v))?;
                }
                map.end()
            }
            other => other.serialize(serializer),
        }
    }
}

struct JsonValueVisitor;

impl<'de> Visitor<'de> for JsonValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonValue, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut arr = JsonArray::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<JsonValue>()? {
            arr.push(item);
        }
        Ok(JsonValue::Array(arr))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonValue, A::Error> {
        let mut obj = JsonObject::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, JsonValue>()? {
            obj.put(k, v);
        }
        Ok(JsonValue::Object(obj))
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JsonValueVisitor)
    }
}

impl<'de> Deserialize<'de> for JsonObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Object(o) => Ok(o),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.json_type().name()),
                &"a JSON object",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for JsonArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Array(a) => Ok(a),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.json_type().name()),
                &"a JSON array",
            )),
        }
    }
}

/// Render `value` compactly, or pretty-printed under `{:#}`.
pub(crate) fn write_json<T: Serialize>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    let rendered = if f.alternate() {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    f.write_str(&rendered.map_err(|_| fmt::Error)?)
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(f, self)
    }
}

impl JsonValue {
    /// Parse JSON text. Object entries keep their textual order.
    pub fn parse(text: &str) -> Result<JsonValue, JsonError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<JsonValue, JsonError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Compact canonical rendering.
    pub fn to_json_string(&self) -> String {
        self.to_string()
    }

    /// Indented rendering.
    pub fn to_pretty_string(&self) -> String {
        format!("{:#}", self)
    }

    /// Compact rendering in strict mode (see [`Strict`]).
    pub fn to_strict_string(&self) -> String {
        serde_json::to_string(&Strict(self)).unwrap_or_else(|_| "null".to_string())
    }
}

impl FromStr for JsonValue {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonValue::parse(s)
    }
}

impl FromStr for JsonObject {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl FromStr for JsonArray {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Convert from `serde_json::Value`. Object order follows the source map.
impl From<serde_json::Value> for JsonValue {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    JsonValue::from(i)
                } else if let Some(u) = n.as_u64() {
                    JsonValue::from(u)
                } else {
                    JsonValue::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(arr) => JsonValue::Array(arr.into_iter().collect()),
            serde_json::Value::Object(map) => JsonValue::Object(map.into_iter().collect()),
        }
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => serde_json::Value::Null,
            JsonValue::Bool(b) => serde_json::Value::Bool(b),
            JsonValue::Number(Number::Int(i)) => serde_json::Value::Number(i.into()),
            JsonValue::Number(Number::UInt(u)) => serde_json::Value::Number(u.into()),
            JsonValue::Number(Number::Float(f)) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonValue::String(s) => serde_json::Value::String(s),
            JsonValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            JsonValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_preserves_textual_order() {
        let v = JsonValue::parse(r#"{"b":1,"a":{"d":true,"c":null}}"#).unwrap();
        assert_eq!(v.to_string(), r#"{"b":1,"a":{"d":true,"c":null}}"#);
    }

    #[test]
    fn parse_error_is_reported() {
        let err = JsonValue::parse("{\"a\":").unwrap_err();
        assert!(matches!(err, JsonError::Parse { .. }));
    }

    #[test]
    fn numbers_keep_their_kind() {
        let v = JsonValue::parse("[1, 1.0, -7, 18446744073709551615]").unwrap();
        let arr = v.as_array().unwrap();
        assert!(matches!(arr.get(0), Some(JsonValue::Number(Number::Int(1)))));
        assert!(matches!(arr.get(1), Some(JsonValue::Number(Number::Float(_)))));
        assert_eq!(arr.get_i32(2), Some(-7));
        assert!(matches!(
            arr.get(3),
            Some(JsonValue::Number(Number::UInt(u64::MAX)))
        ));
        assert_eq!(v.to_string(), "[1,1.0,-7,18446744073709551615]");
    }

    #[test]
    fn non_finite_serializes_as_null() {
        let arr = JsonArray::new().with(f64::NAN).with(f64::INFINITY);
        assert_eq!(arr.to_string(), "[null,null]");
    }

    #[test]
    fn strict_mode_widens_longs() {
        let v = JsonValue::from(
            JsonObject::new()
                .with("small", 12)
                .with("large", 5_000_000_000i64)
                .with("list", JsonArray::new().with(-3_000_000_000i64)),
        );
        assert_eq!(
            v.to_strict_string(),
            r#"{"small":12,"large":5000000000.0,"list":[-3000000000.0]}"#
        );
        assert_eq!(
            v.to_string(),
            r#"{"small":12,"large":5000000000,"list":[-3000000000]}"#
        );
    }

    #[test]
    fn pretty_rendering() {
        let v = JsonValue::from(JsonObject::new().with("a", 1));
        assert_eq!(v.to_pretty_string(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn serde_json_conversion() {
        let source = json!({"name": "x", "tags": ["a", "b"], "n": 2.5});
        let v = JsonValue::from(source.clone());
        assert_eq!(v.get("name").and_then(JsonValue::as_str), Some("x"));
        assert_eq!(serde_json::Value::from(v), source);
    }

    #[test]
    fn object_from_str_rejects_arrays() {
        assert!("[1]".parse::<JsonObject>().is_err());
        assert!("{}".parse::<JsonObject>().is_ok());
        assert!("[1]".parse::<JsonArray>().is_ok());
    }
}
