//! The JsonValue type - a closed tagged union over JSON data.
//!
//! Every kind check comes in two flavours: `is_*` answers whether the value
//! coerces, `as_*` performs the coercion and returns `None` on mismatch. None
//! of them panic or return errors.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{JsonArray, JsonObject, Number};

/// A JSON document node.
#[derive(Clone, Debug, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(JsonArray),
    Object(JsonObject),
}

/// The kinds a value can be checked against.
///
/// `Integer` and `Long` are the 32- and 64-bit integral ranges, `Number` is
/// any finite number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Long,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Check whether `value` coerces to this kind.
    pub fn matches(&self, value: &JsonValue) -> bool {
        match self {
            JsonType::Null => value.is_null(),
            JsonType::Boolean => value.is_bool(),
            JsonType::Integer => value.is_integer(),
            JsonType::Long => value.is_long(),
            JsonType::Number => value.is_number(),
            JsonType::String => value.is_string(),
            JsonType::Array => value.is_array(),
            JsonType::Object => value.is_object(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Long => "long",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl JsonValue {
    /// Create an empty object.
    pub fn object() -> Self {
        JsonValue::Object(JsonObject::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        JsonValue::Array(JsonArray::new())
    }

    /// The most specific kind of this value.
    pub fn json_type(&self) -> JsonType {
        match self {
            JsonValue::Null => JsonType::Null,
            JsonValue::Bool(_) => JsonType::Boolean,
            JsonValue::Number(n) => {
                if n.as_i32().is_some() {
                    JsonType::Integer
                } else if n.as_i64().is_some() {
                    JsonType::Long
                } else {
                    JsonType::Number
                }
            }
            JsonValue::String(_) => JsonType::String,
            JsonValue::Array(_) => JsonType::Array,
            JsonValue::Object(_) => JsonType::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The underlying number, finite or not.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            JsonValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// True for integers and finite doubles. NaN and infinities are not
    /// numbers in this model.
    pub fn is_number(&self) -> bool {
        self.as_number().is_some_and(Number::is_finite)
    }

    /// True when the value is an integer in the 32-bit signed range.
    pub fn is_integer(&self) -> bool {
        self.as_i32().is_some()
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_number().and_then(Number::as_i32)
    }

    /// True when the value is an integer in the 64-bit signed range.
    pub fn is_long(&self) -> bool {
        self.as_i64().is_some()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_number().and_then(Number::as_u64)
    }

    /// True for any finite number.
    pub fn is_double(&self) -> bool {
        self.as_f64().is_some()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut JsonArray> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Look up a key when this value is an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Look up an element when this value is an array.
    pub fn at(&self, index: usize) -> Option<&JsonValue> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Replace this value with `Null`, returning the old one.
    pub fn take(&mut self) -> JsonValue {
        std::mem::take(self)
    }
}

/// Scalars compare structurally; containers compare by their canonical
/// serialization (see [`JsonObject`]).
impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::Number(a), JsonValue::Number(b)) => a == b,
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Array(a), JsonValue::Array(b)) => a == b,
            (JsonValue::Object(a), JsonValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for JsonValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

// Conversion from common types

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        JsonValue::Bool(v)
    }
}

macro_rules! value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for JsonValue {
                fn from(v: $t) -> Self {
                    JsonValue::Number(Number::from(v))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl From<Number> for JsonValue {
    fn from(v: Number) -> Self {
        JsonValue::Number(v)
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        JsonValue::String(v)
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue::String(v.to_string())
    }
}

impl From<JsonArray> for JsonValue {
    fn from(v: JsonArray) -> Self {
        JsonValue::Array(v)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(v: JsonObject) -> Self {
        JsonValue::Object(v)
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(JsonValue::Null)
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(v: Vec<T>) -> Self {
        JsonValue::Array(v.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_none_on_mismatch() {
        let v = JsonValue::from("text");
        assert_eq!(v.as_i32(), None);
        assert_eq!(v.as_f64(), None);
        assert_eq!(v.as_bool(), None);
        assert!(v.as_object().is_none());
        assert!(v.as_array().is_none());
        assert_eq!(v.as_str(), Some("text"));
    }

    #[test]
    fn long_is_not_integer() {
        let v = JsonValue::from(3_000_000_000i64);
        assert!(!v.is_integer());
        assert!(v.is_long());
        assert!(v.is_number());
        assert_eq!(v.json_type(), JsonType::Long);
    }

    #[test]
    fn nan_and_infinity_are_not_doubles() {
        assert!(!JsonValue::from(f64::NAN).is_double());
        assert!(!JsonValue::from(f64::INFINITY).is_double());
        assert!(!JsonValue::from(f64::NAN).is_number());
        assert!(JsonValue::from(2.5).is_double());
        // Integers widen to doubles.
        assert!(JsonValue::from(2).is_double());
    }

    #[test]
    fn json_type_matches() {
        let v = JsonValue::from(12);
        assert!(JsonType::Integer.matches(&v));
        assert!(JsonType::Long.matches(&v));
        assert!(JsonType::Number.matches(&v));
        assert!(!JsonType::String.matches(&v));
        assert!(JsonType::Null.matches(&JsonValue::Null));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(JsonValue::from(None::<i32>), JsonValue::Null);
        assert_eq!(JsonValue::from(Some("x")), JsonValue::from("x"));
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(JsonValue::from(1), JsonValue::from(1.0));
    }

    #[test]
    fn nested_lookup() {
        let v: JsonValue = r#"{"a": [10, {"b": true}]}"#.parse().unwrap();
        assert_eq!(v.get("a").and_then(|a| a.at(0)), Some(&JsonValue::from(10)));
        assert_eq!(
            v.get("a")
                .and_then(|a| a.at(1))
                .and_then(|o| o.get("b"))
                .and_then(JsonValue::as_bool),
            Some(true)
        );
        assert!(v.get("missing").is_none());
    }
}
