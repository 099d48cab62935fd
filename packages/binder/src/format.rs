//! Format hints for binders.

use std::borrow::Cow;
use std::fmt;

/// A media type naming the external representation of a document.
///
/// Comparison in [`Format::matches`] ignores parameters and case, so
/// `application/json; charset=utf-8` is handled by the JSON binder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Format(pub Cow<'static, str>);

impl Format {
    /// JSON (`application/json`)
    pub const JSON: Format = Format(Cow::Borrowed("application/json"));

    /// Flattened `key=value` lines (`text/x-properties`)
    pub const PROPERTIES: Format = Format(Cow::Borrowed("text/x-properties"));

    /// Plain text (`text/plain`)
    pub const TEXT: Format = Format(Cow::Borrowed("text/plain"));

    /// Opaque binary data (`application/octet-stream`)
    pub const OCTET_STREAM: Format = Format(Cow::Borrowed("application/octet-stream"));

    /// An in-memory document that was never serialized.
    pub const VALUE: Format = Format(Cow::Borrowed("application/x-webcore-value"));

    pub const fn from_static(s: &'static str) -> Self {
        Format(Cow::Borrowed(s))
    }

    pub fn new(s: impl Into<String>) -> Self {
        Format(Cow::Owned(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The media type without parameters, e.g. `application/json` for
    /// `application/json; charset=utf-8`.
    pub fn essence(&self) -> &str {
        self.0.split(';').next().unwrap_or_default().trim()
    }

    /// Same media type, ignoring parameters and case.
    pub fn matches(&self, other: &Format) -> bool {
        self.essence().eq_ignore_ascii_case(other.essence())
    }

    pub fn is_json(&self) -> bool {
        self.matches(&Self::JSON)
    }

    pub fn is_properties(&self) -> bool {
        self.matches(&Self::PROPERTIES)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for Format {
    fn from(s: &'static str) -> Self {
        Format(Cow::Borrowed(s))
    }
}

impl From<String> for Format {
    fn from(s: String) -> Self {
        Format(Cow::Owned(s))
    }
}

impl AsRef<str> for Format {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_work() {
        assert_eq!(Format::JSON.as_str(), "application/json");
        assert!(Format::JSON.is_json());
        assert!(!Format::JSON.is_properties());
        assert!(Format::PROPERTIES.is_properties());
    }

    #[test]
    fn parameters_are_ignored() {
        let f = Format::new("application/json; charset=utf-8");
        assert_eq!(f.essence(), "application/json");
        assert!(f.is_json());
        assert_ne!(f, Format::JSON);
    }

    #[test]
    fn case_is_ignored() {
        assert!(Format::from("Application/JSON").is_json());
    }

    #[test]
    fn display_impl() {
        assert_eq!(format!("{}", Format::TEXT), "text/plain");
        assert_eq!(format!("{}", Format::new("text/html")), "text/html");
    }

    #[test]
    fn hash_works() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Format::JSON);
        set.insert(Format::PROPERTIES);
        set.insert(Format::JSON);
        assert_eq!(set.len(), 2);
    }
}
