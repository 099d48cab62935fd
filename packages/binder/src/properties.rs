//! Flattened `key=value` properties text.
//!
//! Nested objects are flattened with dotted keys and array elements with
//! bracketed indexes: `{"db": {"hosts": ["a"]}}` becomes `db.hosts[0]=a`.
//! Properties text carries no types, so every decoded leaf is a string and
//! `null` is written as an empty value. Empty containers are not written.
//! Key characters that would read as structure (`.`, `[`, `]`) are escaped
//! with a backslash. Empty keys have no spelling and fail to encode.

use std::fmt::Write as _;

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use webcore_json::{JsonError, JsonValue};

use crate::{Binder, Format};

/// Most nulls a single decoded index may pad an array with.
const MAX_INDEX_GAP: usize = 1024;

/// A binder for [`Format::PROPERTIES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesBinder;

impl Binder for PropertiesBinder {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<JsonValue, JsonError> {
        if !self.supports(format) {
            return Err(JsonError::UnsupportedFormat(format.to_string()));
        }

        let decode_error = |message: String| JsonError::Decode {
            format: format.to_string(),
            message,
        };

        let text = std::str::from_utf8(bytes).map_err(|e| decode_error(e.to_string()))?;

        let mut root = JsonValue::object();
        for (line_no, line) in logical_lines(text) {
            let (raw_key, raw_value) = split_entry(&line);
            let keys = parse_key(raw_key).ok_or_else(|| {
                decode_error(format!("line {}: invalid key '{}'", line_no, raw_key))
            })?;
            insert(&mut root, &keys, JsonValue::String(unescape(raw_value)))
                .map_err(|m| decode_error(format!("line {}: {}", line_no, m)))?;
        }
        Ok(root)
    }

    fn encode(&self, value: &JsonValue, format: &Format) -> Result<Bytes, JsonError> {
        if !self.supports(format) {
            return Err(JsonError::UnsupportedFormat(format.to_string()));
        }
        if !value.is_object() {
            return Err(JsonError::Encode {
                format: format.to_string(),
                message: format!("expected an object at the root, found {}", value.json_type()),
            });
        }

        let mut out = String::new();
        flatten("", value, &mut out).map_err(|message| JsonError::Encode {
            format: format.to_string(),
            message,
        })?;
        Ok(Bytes::from(out))
    }

    fn supports(&self, format: &Format) -> bool {
        format.is_properties()
    }
}

fn flatten(prefix: &str, value: &JsonValue, out: &mut String) -> Result<(), String> {
    match value {
        JsonValue::Object(obj) => {
            for (key, child) in obj {
                if key.is_empty() {
                    return Err(format!("empty key under '{}' cannot be written", prefix));
                }
                let key = escape_key(key);
                if prefix.is_empty() {
                    flatten(&key, child, out)?;
                } else {
                    flatten(&format!("{}.{}", prefix, key), child, out)?;
                }
            }
        }
        JsonValue::Array(arr) => {
            for (index, child) in arr.iter().enumerate() {
                flatten(&format!("{}[{}]", prefix, index), child, out)?;
            }
        }
        JsonValue::Null => {
            let _ = writeln!(out, "{}=", prefix);
        }
        JsonValue::String(s) => {
            let _ = writeln!(out, "{}={}", prefix, escape_value(s));
        }
        scalar => {
            let _ = writeln!(out, "{}={}", prefix, scalar);
        }
    }
    Ok(())
}

fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '=' | ':' | ' ' | '#' | '!' | '\\' | '.' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => push_escaped(&mut escaped, c),
        }
    }
    escaped
}

fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            ' ' if i == 0 => escaped.push_str("\\ "),
            '\\' => escaped.push_str("\\\\"),
            _ => push_escaped(&mut escaped, c),
        }
    }
    escaped
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        _ => out.push(c),
    }
}

/// Join continuation lines and drop blanks and comments. Yields the
/// 1-based number of the line each entry starts on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut entries = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_start();
        let (start, mut buffer) = match pending.take() {
            Some(partial) => partial,
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                (i + 1, String::new())
            }
        };

        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            buffer.push_str(&line[..line.len() - 1]);
            pending = Some((start, buffer));
        } else {
            buffer.push_str(line);
            entries.push((start, buffer));
        }
    }
    if let Some(partial) = pending {
        entries.push(partial);
    }
    entries
}

/// Split at the first unescaped separator: `=`, `:` or whitespace.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[derive(Debug, PartialEq)]
enum Key {
    Field(String),
    Index(usize),
}

/// Parse a raw `a.b[0][1].c` key into keys. Escaped characters belong to
/// field names; everything else outside a name is structure. The root is
/// always an object, so the first key must name a field.
fn parse_key(raw: &str) -> Option<Vec<Key>> {
    lazy_static! {
        static ref INDEX: Regex = Regex::new(r"^\[([0-9]+)\]").unwrap();
    }

    let mut keys = Vec::new();
    let mut name = String::new();
    // Set once a segment has an index; a name may not follow it.
    let mut indexed = false;
    let mut rest = raw;

    while let Some(c) = rest.chars().next() {
        match c {
            '\\' => {
                if indexed {
                    return None;
                }
                let len = prefix_len(rest, 2);
                name.push_str(&rest[..len]);
                rest = &rest[len..];
            }
            '.' => {
                end_segment(&mut keys, &mut name, indexed)?;
                indexed = false;
                rest = &rest[1..];
            }
            '[' => {
                if !name.is_empty() {
                    keys.push(Key::Field(unescape(&name)));
                    name.clear();
                } else if keys.is_empty() {
                    return None;
                }
                let caps = INDEX.captures(rest)?;
                keys.push(Key::Index(caps[1].parse().ok()?));
                indexed = true;
                rest = &rest[caps[0].len()..];
            }
            ']' => return None,
            _ => {
                if indexed {
                    return None;
                }
                name.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    end_segment(&mut keys, &mut name, indexed)?;
    Some(keys)
}

/// Byte length of the first `count` chars of `s`.
fn prefix_len(s: &str, count: usize) -> usize {
    s.char_indices().nth(count).map_or(s.len(), |(i, _)| i)
}

/// Close a dot-separated segment. A segment needs a name or an index.
fn end_segment(keys: &mut Vec<Key>, name: &mut String, indexed: bool) -> Option<()> {
    if name.is_empty() {
        return indexed.then_some(());
    }
    keys.push(Key::Field(unescape(name)));
    name.clear();
    Some(())
}

fn insert(root: &mut JsonValue, keys: &[Key], value: JsonValue) -> Result<(), String> {
    let mut cursor = root;
    for (i, key) in keys.iter().enumerate() {
        let last = i + 1 == keys.len();
        let container = || match keys.get(i + 1) {
            Some(Key::Index(_)) => JsonValue::array(),
            _ => JsonValue::object(),
        };

        cursor = match (key, cursor) {
            (Key::Field(name), JsonValue::Object(obj)) => {
                if last {
                    obj.put(name.as_str(), value);
                    return Ok(());
                }
                if !obj.contains_key(name) {
                    obj.put(name.as_str(), container());
                }
                obj.get_mut(name)
                    .ok_or_else(|| format!("cannot descend into '{}'", name))?
            }
            (Key::Index(index), JsonValue::Array(arr)) => {
                let too_far = |_: JsonError| {
                    format!(
                        "index [{}] is more than {} past the end of the list",
                        index, MAX_INDEX_GAP
                    )
                };
                if last {
                    return arr.try_set(*index, value, MAX_INDEX_GAP).map_err(too_far);
                }
                if arr.get(*index).map_or(true, JsonValue::is_null) {
                    arr.try_set(*index, container(), MAX_INDEX_GAP)
                        .map_err(too_far)?;
                }
                arr.get_mut(*index)
                    .ok_or_else(|| format!("cannot descend into [{}]", index))?
            }
            (Key::Field(name), other) => {
                return Err(format!("'{}' conflicts with a {} value", name, other.json_type()))
            }
            (Key::Index(index), other) => {
                return Err(format!("[{}] conflicts with a {} value", index, other.json_type()))
            }
        };
    }
    Ok(())
}
