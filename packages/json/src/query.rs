//! Evaluating path expressions: queries and in-place mutations.

use std::collections::HashSet;

use crate::{JsonArray, JsonError, JsonObject, JsonPath, JsonValue, Location, Segment, Step};

/// Resolve a possibly negative index against an array length.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs() as usize)
    } else {
        let index = index as usize;
        (index < len).then_some(index)
    }
}

/// Apply one segment to `node`, appending matches in document order.
fn select<'a>(
    node: &'a JsonValue,
    at: &Location,
    segment: &Segment,
    out: &mut Vec<(Location, &'a JsonValue)>,
) {
    match (segment, node) {
        (Segment::Field(name), JsonValue::Object(obj)) => {
            if let Some(value) = obj.get(name) {
                out.push((at.child(Step::Key(name.clone())), value));
            }
        }
        (Segment::Field(name), JsonValue::Array(arr)) => {
            if let Some((index, value)) = name
                .parse::<usize>()
                .ok()
                .and_then(|i| arr.get(i).map(|v| (i, v)))
            {
                out.push((at.child(Step::Index(index)), value));
            }
        }
        (Segment::Index(index), JsonValue::Array(arr)) => {
            if let Some(index) = resolve_index(*index, arr.len()) {
                if let Some(value) = arr.get(index) {
                    out.push((at.child(Step::Index(index)), value));
                }
            }
        }
        (Segment::Wildcard, JsonValue::Object(obj)) => {
            for (key, value) in obj {
                out.push((at.child(Step::Key(key.clone())), value));
            }
        }
        (Segment::Wildcard, JsonValue::Array(arr)) => {
            for (index, value) in arr.iter().enumerate() {
                out.push((at.child(Step::Index(index)), value));
            }
        }
        (Segment::Descendant(inner), _) => descend(node, at, inner, out),
        _ => {}
    }
}

fn descend<'a>(
    node: &'a JsonValue,
    at: &Location,
    inner: &Segment,
    out: &mut Vec<(Location, &'a JsonValue)>,
) {
    select(node, at, inner, out);
    match node {
        JsonValue::Object(obj) => {
            for (key, value) in obj {
                descend(value, &at.child(Step::Key(key.clone())), inner, out);
            }
        }
        JsonValue::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                descend(value, &at.child(Step::Index(index)), inner, out);
            }
        }
        _ => {}
    }
}

fn follow_mut<'a>(doc: &'a mut JsonValue, location: &Location) -> Option<&'a mut JsonValue> {
    let mut cursor = doc;
    for step in &location.steps {
        cursor = match (step, cursor) {
            (Step::Key(key), JsonValue::Object(obj)) => obj.get_mut(key)?,
            (Step::Index(index), JsonValue::Array(arr)) => arr.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(cursor)
}

/// Locations ordered so that descendants precede ancestors and higher array
/// indexes precede lower ones. Removing entries in this order never
/// invalidates a location still to be visited.
fn deepest_first(mut locations: Vec<Location>) -> Vec<Location> {
    locations.sort();
    locations.reverse();
    locations
}

impl JsonPath {
    /// Every match with its concrete location, in document order.
    pub fn matches<'a>(&self, doc: &'a JsonValue) -> Vec<(Location, &'a JsonValue)> {
        let mut current = vec![(Location::root(), doc)];
        for segment in &self.segments {
            let mut next = Vec::new();
            for (at, node) in &current {
                select(node, at, segment, &mut next);
            }
            // A node can be reached twice through stacked descendant segments.
            let mut seen = HashSet::new();
            next.retain(|(location, _)| seen.insert(location.clone()));
            current = next;
        }
        current
    }

    /// Locations of every match, in document order.
    pub fn locate(&self, doc: &JsonValue) -> Vec<Location> {
        self.matches(doc).into_iter().map(|(at, _)| at).collect()
    }

    /// Every matched value, in document order.
    pub fn query<'a>(&self, doc: &'a JsonValue) -> Vec<&'a JsonValue> {
        self.matches(doc).into_iter().map(|(_, v)| v).collect()
    }

    /// At most `limit` matched values.
    pub fn query_limit<'a>(&self, doc: &'a JsonValue, limit: usize) -> Vec<&'a JsonValue> {
        let mut results = self.query(doc);
        results.truncate(limit);
        results
    }

    /// The first matched value.
    pub fn query_first<'a>(&self, doc: &'a JsonValue) -> Option<&'a JsonValue> {
        self.query(doc).into_iter().next()
    }

    pub fn read_str<'a>(&self, doc: &'a JsonValue) -> Option<&'a str> {
        self.query_first(doc).and_then(JsonValue::as_str)
    }

    pub fn read_bool(&self, doc: &JsonValue) -> Option<bool> {
        self.query_first(doc).and_then(JsonValue::as_bool)
    }

    pub fn read_i32(&self, doc: &JsonValue) -> Option<i32> {
        self.query_first(doc).and_then(JsonValue::as_i32)
    }

    pub fn read_i64(&self, doc: &JsonValue) -> Option<i64> {
        self.query_first(doc).and_then(JsonValue::as_i64)
    }

    pub fn read_f64(&self, doc: &JsonValue) -> Option<f64> {
        self.query_first(doc).and_then(JsonValue::as_f64)
    }

    pub fn read_object<'a>(&self, doc: &'a JsonValue) -> Option<&'a JsonObject> {
        self.query_first(doc).and_then(JsonValue::as_object)
    }

    pub fn read_array<'a>(&self, doc: &'a JsonValue) -> Option<&'a JsonArray> {
        self.query_first(doc).and_then(JsonValue::as_array)
    }

    /// Write `value` at every location the path selects.
    ///
    /// When the final segment is a member or index, the parent locations are
    /// resolved and the member is inserted (or the element replaced, or
    /// appended when the index equals the length). Otherwise only existing
    /// matches are replaced. Returns the number of locations written.
    ///
    /// Every parent is checked before anything is written, so an error
    /// leaves the document unchanged.
    pub fn set(&self, doc: &mut JsonValue, value: JsonValue) -> Result<usize, JsonError> {
        let Some((parent, last)) = self.split_last() else {
            *doc = value;
            return Ok(1);
        };

        let mut touched = 0;
        match last {
            Segment::Field(_) | Segment::Index(_) => {
                let parents = deepest_first(parent.locate(doc));
                for location in &parents {
                    if let Some(node) = doc.pointer(location) {
                        check_child(node, last, location)?;
                    }
                }
                for location in parents {
                    let Some(node) = follow_mut(doc, &location) else {
                        continue;
                    };
                    write_child(node, last, value.clone(), &location)?;
                    touched += 1;
                }
            }
            Segment::Wildcard | Segment::Descendant(_) => {
                for location in deepest_first(self.locate(doc)) {
                    if let Some(node) = follow_mut(doc, &location) {
                        *node = value.clone();
                        touched += 1;
                    }
                }
            }
        }

        if touched == 0 {
            return Err(JsonError::PathNotFound {
                path: self.to_string(),
            });
        }
        Ok(touched)
    }

    /// Insert `key: value` into every object the path selects.
    ///
    /// Fails without writing anything if any selected value is not an
    /// object.
    pub fn put(
        &self,
        doc: &mut JsonValue,
        key: &str,
        value: JsonValue,
    ) -> Result<usize, JsonError> {
        self.for_each_container(doc, "an object", JsonValue::is_object, |node| {
            if let JsonValue::Object(obj) = node {
                obj.put(key, value.clone());
            }
        })
    }

    /// Append `value` to every array the path selects.
    ///
    /// Fails without writing anything if any selected value is not an
    /// array.
    pub fn add(&self, doc: &mut JsonValue, value: JsonValue) -> Result<usize, JsonError> {
        self.for_each_container(doc, "an array", JsonValue::is_array, |node| {
            if let JsonValue::Array(arr) = node {
                arr.push(value.clone());
            }
        })
    }

    /// Remove every selected entry. Deleting the root leaves `null`.
    ///
    /// Returns the number of entries removed; a path that matches nothing
    /// is not an error.
    pub fn delete(&self, doc: &mut JsonValue) -> usize {
        if self.is_root() {
            *doc = JsonValue::Null;
            return 1;
        }

        let mut removed = 0;
        for location in deepest_first(self.locate(doc)) {
            let Some((parent, step)) = location.split_last() else {
                continue;
            };
            let gone = match (step, follow_mut(doc, &parent)) {
                (Step::Key(key), Some(JsonValue::Object(obj))) => obj.remove(key).is_some(),
                (Step::Index(index), Some(JsonValue::Array(arr))) => arr.remove(*index).is_ok(),
                _ => false,
            };
            if gone {
                removed += 1;
            }
        }
        removed
    }

    /// Replace every selected value with `f(old)`.
    ///
    /// Descendants are mapped before their ancestors.
    pub fn map<F>(&self, doc: &mut JsonValue, mut f: F) -> usize
    where
        F: FnMut(JsonValue) -> JsonValue,
    {
        let mut mapped = 0;
        for location in deepest_first(self.locate(doc)) {
            if let Some(node) = follow_mut(doc, &location) {
                *node = f(node.take());
                mapped += 1;
            }
        }
        mapped
    }

    fn for_each_container<F>(
        &self,
        doc: &mut JsonValue,
        expected: &'static str,
        accepts: fn(&JsonValue) -> bool,
        mut apply: F,
    ) -> Result<usize, JsonError>
    where
        F: FnMut(&mut JsonValue),
    {
        let matches = self.matches(doc);
        if matches.is_empty() {
            return Err(JsonError::PathNotFound {
                path: self.to_string(),
            });
        }
        if let Some((location, _)) = matches.iter().find(|(_, node)| !accepts(node)) {
            return Err(JsonError::WrongType {
                path: location.to_string(),
                expected,
            });
        }

        let locations = matches.into_iter().map(|(location, _)| location).collect();
        let mut touched = 0;
        for location in deepest_first(locations) {
            if let Some(node) = follow_mut(doc, &location) {
                apply(node);
                touched += 1;
            }
        }
        Ok(touched)
    }
}

/// Fail the way [`write_child`] would, without writing.
fn check_child(node: &JsonValue, last: &Segment, location: &Location) -> Result<(), JsonError> {
    let wrong_type = |expected| JsonError::WrongType {
        path: location.to_string(),
        expected,
    };
    match (last, node) {
        (Segment::Field(_), JsonValue::Object(_)) => Ok(()),
        (Segment::Field(name), JsonValue::Array(arr)) => match name.parse::<i64>() {
            Ok(index) if index >= 0 => check_element(arr, index),
            _ => Err(wrong_type("an object")),
        },
        (Segment::Index(index), JsonValue::Array(arr)) => check_element(arr, *index),
        (Segment::Index(_), _) => Err(wrong_type("an array")),
        _ => Err(wrong_type("an object")),
    }
}

fn check_element(arr: &JsonArray, index: i64) -> Result<(), JsonError> {
    let len = arr.len();
    if resolve_index(index, len).is_some() || (index >= 0 && index as usize == len) {
        return Ok(());
    }
    Err(JsonError::IndexOutOfBounds {
        index: index.unsigned_abs() as usize,
        len,
    })
}

/// Write `value` as the child `last` of `node`.
fn write_child(
    node: &mut JsonValue,
    last: &Segment,
    value: JsonValue,
    location: &Location,
) -> Result<(), JsonError> {
    match (last, node) {
        (Segment::Field(name), JsonValue::Object(obj)) => {
            obj.put(name.clone(), value);
            Ok(())
        }
        (Segment::Field(name), JsonValue::Array(arr)) => match name.parse::<i64>() {
            Ok(index) if index >= 0 => write_element(arr, index, value),
            _ => Err(JsonError::WrongType {
                path: location.to_string(),
                expected: "an object",
            }),
        },
        (Segment::Index(index), JsonValue::Array(arr)) => write_element(arr, *index, value),
        (Segment::Index(_), _) => Err(JsonError::WrongType {
            path: location.to_string(),
            expected: "an array",
        }),
        _ => Err(JsonError::WrongType {
            path: location.to_string(),
            expected: "an object",
        }),
    }
}

fn write_element(arr: &mut JsonArray, index: i64, value: JsonValue) -> Result<(), JsonError> {
    let len = arr.len();
    if let Some(existing) = resolve_index(index, len).and_then(|i| arr.get_mut(i)) {
        *existing = value;
        return Ok(());
    }
    if index >= 0 && index as usize == len {
        arr.push(value);
        return Ok(());
    }
    Err(JsonError::IndexOutOfBounds {
        index: index.unsigned_abs() as usize,
        len,
    })
}

impl JsonValue {
    /// Evaluate a path expression against this document.
    pub fn select(&self, expression: &str) -> Result<Vec<&JsonValue>, JsonError> {
        Ok(JsonPath::parse(expression)?.query(self))
    }

    /// The value at a concrete location.
    pub fn pointer(&self, location: &Location) -> Option<&JsonValue> {
        let mut cursor = self;
        for step in &location.steps {
            cursor = match (step, cursor) {
                (Step::Key(key), JsonValue::Object(obj)) => obj.get(key)?,
                (Step::Index(index), JsonValue::Array(arr)) => arr.get(*index)?,
                _ => return None,
            };
        }
        Some(cursor)
    }
}
