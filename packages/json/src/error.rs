//! Error types for the JSON document layer.

/// Errors raised by the document model, the path engine and binders.
///
/// Type accessors never produce these: a mismatched or out-of-range lookup
/// yields `None`. Errors are reserved for operations that cannot complete,
/// such as popping an empty array or writing through a path that matches
/// nothing.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    /// Input text is not valid JSON.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// `pop` or `shift` on an array without elements.
    #[error("cannot {operation} an empty array")]
    EmptyArray { operation: &'static str },

    /// Positional access outside the array.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A path expression could not be parsed.
    #[error("invalid path '{expression}' at position {position}: {message}")]
    InvalidPath {
        expression: String,
        position: usize,
        message: String,
    },

    /// A mutation matched no location in the document.
    #[error("no location matches path '{path}'")]
    PathNotFound { path: String },

    /// A matched location holds the wrong kind of value for the operation.
    #[error("value at '{path}' is not {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },

    /// A binder failed to decode input.
    #[error("decode error ({format}): {message}")]
    Decode { format: String, message: String },

    /// A binder failed to encode a document.
    #[error("encode error ({format}): {message}")]
    Encode { format: String, message: String },

    /// No binder handles the requested format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        JsonError::Parse {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_array_display() {
        let e = JsonError::EmptyArray { operation: "pop" };
        assert_eq!(e.to_string(), "cannot pop an empty array");
    }

    #[test]
    fn invalid_path_display() {
        let e = JsonError::InvalidPath {
            expression: "a..[".to_string(),
            position: 3,
            message: "unterminated bracket".to_string(),
        };
        let display = e.to_string();
        assert!(display.contains("a..["));
        assert!(display.contains("position 3"));
        assert!(display.contains("unterminated bracket"));
    }

    #[test]
    fn wrong_type_display() {
        let e = JsonError::WrongType {
            path: "$['items']".to_string(),
            expected: "an array",
        };
        assert_eq!(e.to_string(), "value at '$['items']' is not an array");
    }

    #[test]
    fn parse_error_conversion_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }").unwrap_err();
        let e: JsonError = err.into();
        match e {
            JsonError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
