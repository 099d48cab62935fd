//! The binder trait and the JSON binder.

use bytes::Bytes;
use webcore_json::{JsonError, JsonValue, Strict};

use crate::Format;

/// Converts between documents and an external byte representation.
pub trait Binder: Send + Sync {
    /// Decode bytes into a document.
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<JsonValue, JsonError>;

    /// Encode a document to bytes.
    fn encode(&self, value: &JsonValue, format: &Format) -> Result<Bytes, JsonError>;

    /// Check if this binder handles the given format.
    fn supports(&self, format: &Format) -> bool;
}

/// How the JSON binder lays out its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// Single line, no insignificant whitespace.
    #[default]
    Compact,
    /// Indented over multiple lines.
    Pretty,
    /// Compact, with integers outside the 32-bit range written as doubles.
    Strict,
}

/// A binder that handles JSON encoding/decoding.
///
/// # Example
///
/// ```rust
/// use webcore_binder::{Binder, Bytes, Format, JsonBinder};
/// use webcore_json::JsonValue;
///
/// let binder = JsonBinder::default();
/// let value = JsonValue::from("hello");
///
/// let bytes = binder.encode(&value, &Format::JSON).unwrap();
/// let decoded = binder.decode(&bytes, &Format::JSON).unwrap();
///
/// assert_eq!(decoded, value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBinder {
    style: JsonStyle,
}

impl JsonBinder {
    pub fn new(style: JsonStyle) -> Self {
        Self { style }
    }

    pub fn pretty() -> Self {
        Self::new(JsonStyle::Pretty)
    }

    pub fn strict() -> Self {
        Self::new(JsonStyle::Strict)
    }

    pub fn style(&self) -> JsonStyle {
        self.style
    }
}

impl Binder for JsonBinder {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<JsonValue, JsonError> {
        if !self.supports(format) {
            return Err(JsonError::UnsupportedFormat(format.to_string()));
        }

        serde_json::from_slice(bytes).map_err(|e| JsonError::Decode {
            format: format.to_string(),
            message: e.to_string(),
        })
    }

    fn encode(&self, value: &JsonValue, format: &Format) -> Result<Bytes, JsonError> {
        if !self.supports(format) {
            return Err(JsonError::UnsupportedFormat(format.to_string()));
        }

        let encoded = match self.style {
            JsonStyle::Compact => serde_json::to_vec(value),
            JsonStyle::Pretty => serde_json::to_vec_pretty(value),
            JsonStyle::Strict => serde_json::to_vec(&Strict(value)),
        };
        let bytes = encoded.map_err(|e| JsonError::Encode {
            format: format.to_string(),
            message: e.to_string(),
        })?;

        Ok(Bytes::from(bytes))
    }

    fn supports(&self, format: &Format) -> bool {
        format.is_json()
    }
}

/// A binder that combines multiple binders.
///
/// Routes encode/decode to the first registered binder that supports the
/// format.
pub struct MultiBinder {
    binders: Vec<Box<dyn Binder>>,
}

impl MultiBinder {
    /// Create an empty multi-binder.
    pub fn new() -> Self {
        Self {
            binders: Vec::new(),
        }
    }

    /// Add a binder.
    pub fn add(&mut self, binder: impl Binder + 'static) {
        self.binders.push(Box::new(binder));
    }

    /// Builder form of [`MultiBinder::add`].
    pub fn with(mut self, binder: impl Binder + 'static) -> Self {
        self.add(binder);
        self
    }

    /// Create a multi-binder with the JSON binder included.
    pub fn with_json() -> Self {
        Self::new().with(JsonBinder::default())
    }

    fn route(&self, format: &Format) -> Result<&dyn Binder, JsonError> {
        self.binders
            .iter()
            .find(|b| b.supports(format))
            .map(|b| b.as_ref())
            .ok_or_else(|| JsonError::UnsupportedFormat(format.to_string()))
    }
}

impl Default for MultiBinder {
    fn default() -> Self {
        Self::with_json().with(crate::PropertiesBinder)
    }
}

impl Binder for MultiBinder {
    fn decode(&self, bytes: &Bytes, format: &Format) -> Result<JsonValue, JsonError> {
        self.route(format)?.decode(bytes, format)
    }

    fn encode(&self, value: &JsonValue, format: &Format) -> Result<Bytes, JsonError> {
        self.route(format)?.encode(value, format)
    }

    fn supports(&self, format: &Format) -> bool {
        self.binders.iter().any(|b| b.supports(format))
    }
}
