//! Insertion-ordered JSON object.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::{JsonArray, JsonValue};

/// An insertion-ordered map of string keys to [`JsonValue`]s.
///
/// Equality and hashing go through the canonical compact serialization, so
/// two objects holding the same entries in a different insertion order are
/// *not* equal. Typed getters return `None` when the key is missing or the
/// value does not coerce.
#[derive(Clone, Debug, Default)]
pub struct JsonObject {
    entries: IndexMap<String, JsonValue>,
}

impl JsonObject {
    /// An empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty object with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the object has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry, returning the previous value.
    ///
    /// Replacing keeps the key's original position.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`put`](Self::put).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.put(key, value);
        self
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.entries.get_mut(key)
    }

    /// True when an entry exists for `key`, even a `null` one.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.shift_remove(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &JsonValue> {
        self.entries.values()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.entries.iter()
    }

    /// Entries in insertion order, with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut JsonValue)> {
        self.entries.iter_mut()
    }

    /// Shallow merge: entries of `other` replace or extend this object.
    pub fn merge(&mut self, other: JsonObject) {
        self.entries.extend(other.entries);
    }

    /// The string at `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(JsonValue::as_str)
    }

    /// The string at `key`, or `default` when absent or not a string.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    /// The boolean at `key`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(JsonValue::as_bool)
    }

    /// The number at `key`, if it fits an `i32`.
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(JsonValue::as_i32)
    }

    /// The number at `key`, if it fits an `i64`.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(JsonValue::as_i64)
    }

    /// The number at `key`, if it fits a `u64`.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(JsonValue::as_u64)
    }

    /// The number at `key` as a float.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(JsonValue::as_f64)
    }

    /// The object at `key`.
    pub fn get_object(&self, key: &str) -> Option<&JsonObject> {
        self.get(key).and_then(JsonValue::as_object)
    }

    /// Mutable access to the object at `key`.
    pub fn get_object_mut(&mut self, key: &str) -> Option<&mut JsonObject> {
        self.get_mut(key).and_then(JsonValue::as_object_mut)
    }

    /// The array at `key`.
    pub fn get_array(&self, key: &str) -> Option<&JsonArray> {
        self.get(key).and_then(JsonValue::as_array)
    }

    /// Mutable access to the array at `key`.
    pub fn get_array_mut(&mut self, key: &str) -> Option<&mut JsonArray> {
        self.get_mut(key).and_then(JsonValue::as_array_mut)
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for JsonObject {}

impl Hash for JsonObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::serialize::write_json(f, self)
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<JsonValue>> Extend<(K, V)> for JsonObject {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl IntoIterator for JsonObject {
    type Item = (String, JsonValue);
    type IntoIter = indexmap::map::IntoIter<String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = (&'a String, &'a JsonValue);
    type IntoIter = indexmap::map::Iter<'a, String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
