//! JSON array with JavaScript-style operations.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{JsonError, JsonObject, JsonValue};

/// An ordered list of [`JsonValue`]s.
///
/// Mutators follow `Array.prototype` semantics where they overlap: negative
/// offsets count from the end and are clamped into range. Unlike
/// JavaScript, `pop` and `shift` on an empty array are errors rather than
/// returning `undefined`.
#[derive(Clone, Debug, Default)]
pub struct JsonArray {
    items: Vec<JsonValue>,
}

/// Resolve a JavaScript-style relative offset against `len`.
fn relative_index(offset: i64, len: usize) -> usize {
    if offset < 0 {
        len.saturating_sub(offset.unsigned_abs() as usize)
    } else {
        (offset as usize).min(len)
    }
}

impl JsonArray {
    /// An empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&JsonValue> {
        self.items.get(index)
    }

    /// Mutable access to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut JsonValue> {
        self.items.get_mut(index)
    }

    /// Elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, JsonValue> {
        self.items.iter()
    }

    /// Mutable elements in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, JsonValue> {
        self.items.iter_mut()
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[JsonValue] {
        &self.items
    }

    /// Append a value, returning the new length.
    pub fn push(&mut self, value: impl Into<JsonValue>) -> usize {
        self.items.push(value.into());
        self.items.len()
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, value: impl Into<JsonValue>) -> Self {
        self.push(value);
        self
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Result<JsonValue, JsonError> {
        self.items
            .pop()
            .ok_or(JsonError::EmptyArray { operation: "pop" })
    }

    /// Remove and return the first element.
    pub fn shift(&mut self) -> Result<JsonValue, JsonError> {
        if self.items.is_empty() {
            return Err(JsonError::EmptyArray { operation: "shift" });
        }
        Ok(self.items.remove(0))
    }

    /// Prepend a value, returning the new length.
    pub fn unshift(&mut self, value: impl Into<JsonValue>) -> usize {
        self.items.insert(0, value.into());
        self.items.len()
    }

    /// Overwrite the range `[start, end)` with clones of `value`.
    ///
    /// `end` defaults to the length. The array never grows.
    pub fn fill(&mut self, value: impl Into<JsonValue>, start: i64, end: Option<i64>) -> &mut Self {
        let len = self.items.len();
        let from = relative_index(start, len);
        let to = end.map_or(len, |e| relative_index(e, len));
        if from < to {
            let value = value.into();
            for slot in &mut self.items[from..to] {
                *slot = value.clone();
            }
        }
        self
    }

    /// Remove `delete_count` elements at `start` and insert `items` in their
    /// place, returning the removed elements.
    pub fn splice(
        &mut self,
        start: i64,
        delete_count: usize,
        items: impl IntoIterator<Item = JsonValue>,
    ) -> JsonArray {
        let len = self.items.len();
        let from = relative_index(start, len);
        let to = from.saturating_add(delete_count).min(len);
        self.items.splice(from..to, items).collect()
    }

    /// Copy of the range `[start, end)`.
    pub fn slice(&self, start: i64, end: Option<i64>) -> JsonArray {
        let len = self.items.len();
        let from = relative_index(start, len);
        let to = end.map_or(len, |e| relative_index(e, len));
        if from >= to {
            return JsonArray::new();
        }
        self.items[from..to].iter().cloned().collect()
    }

    /// Replace the element at `index`, padding with nulls when `index` is
    /// past the end.
    pub fn set(&mut self, index: usize, value: impl Into<JsonValue>) {
        if index >= self.items.len() {
            self.items.resize(index, JsonValue::Null);
            self.items.push(value.into());
        } else {
            self.items[index] = value.into();
        }
    }

    /// Like [`set`](Self::set), but pads at most `max_padding` nulls.
    /// Writing further past the end is an `IndexOutOfBounds` error and
    /// leaves the array untouched.
    pub fn try_set(
        &mut self,
        index: usize,
        value: impl Into<JsonValue>,
        max_padding: usize,
    ) -> Result<(), JsonError> {
        let len = self.items.len();
        if index > len && index - len > max_padding {
            return Err(JsonError::IndexOutOfBounds { index, len });
        }
        self.set(index, value);
        Ok(())
    }

    /// Insert `value` before `index`. `index` may equal the length.
    pub fn insert(&mut self, index: usize, value: impl Into<JsonValue>) -> Result<(), JsonError> {
        if index > self.items.len() {
            return Err(JsonError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, value.into());
        Ok(())
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<JsonValue, JsonError> {
        if index >= self.items.len() {
            return Err(JsonError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Position of the first element equal to `value`.
    pub fn index_of(&self, value: &JsonValue) -> Option<usize> {
        self.items.iter().position(|v| v == value)
    }

    /// True when some element equals `value`.
    pub fn contains(&self, value: &JsonValue) -> bool {
        self.index_of(value).is_some()
    }

    /// Reverse the elements in place.
    pub fn reverse(&mut self) -> &mut Self {
        self.items.reverse();
        self
    }

    /// A new array holding this array's elements followed by `other`'s.
    pub fn concat(&self, other: &JsonArray) -> JsonArray {
        self.items.iter().chain(other.items.iter()).cloned().collect()
    }

    /// The string at `index`. `None` when missing or not a string, as
    /// with the other typed getters below.
    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(JsonValue::as_str)
    }

    /// The boolean at `index`.
    pub fn get_bool(&self, index: usize) -> Option<bool> {
        self.get(index).and_then(JsonValue::as_bool)
    }

    /// The number at `index`, if it fits an `i32`.
    pub fn get_i32(&self, index: usize) -> Option<i32> {
        self.get(index).and_then(JsonValue::as_i32)
    }

    /// The number at `index`, if it fits an `i64`.
    pub fn get_i64(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(JsonValue::as_i64)
    }

    /// The number at `index` as a float.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(JsonValue::as_f64)
    }

    /// The object at `index`.
    pub fn get_object(&self, index: usize) -> Option<&JsonObject> {
        self.get(index).and_then(JsonValue::as_object)
    }

    /// The array at `index`.
    pub fn get_array(&self, index: usize) -> Option<&JsonArray> {
        self.get(index).and_then(JsonValue::as_array)
    }
}

impl PartialEq for JsonArray {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for JsonArray {}

impl Hash for JsonArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::serialize::write_json(f, self)
    }
}

impl<V: Into<JsonValue>> FromIterator<V> for JsonArray {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<JsonValue>> Extend<V> for JsonArray {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for JsonArray {
    type Item = JsonValue;
    type IntoIter = std::vec::IntoIter<JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonArray {
    type Item = &'a JsonValue;
    type IntoIter = std::slice::Iter<'a, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
