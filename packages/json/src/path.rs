//! Path expressions over JSON documents.
//!
//! # Syntax
//!
//! - `$` names the root and may be omitted
//! - `.name` or a leading bare `name` selects an object member; names must be
//!   Unicode identifiers or all digits
//! - `['any name']` / `["any name"]` selects a member with any key
//! - `[3]` selects an array element, `[-1]` counts from the end
//! - `*` / `[*]` selects every member or element
//! - `..name`, `..*`, `..['name']` select at any depth
//!
//! A member name made of digits also selects the element at that index when
//! applied to an array.

use std::fmt;
use std::str::FromStr;

use crate::JsonError;

/// One selection step of a [`JsonPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    Index(i64),
    Wildcard,
    /// Apply the inner selection to the current node and all descendants.
    Descendant(Box<Segment>),
}

/// A parsed path expression.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    pub segments: Vec<Segment>,
}

/// A concrete step into a document, as used by [`Location`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// The concrete position of one value inside a document.
///
/// Renders as `$['field'][2]`, which parses back as a [`JsonPath`] selecting
/// exactly this position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub steps: Vec<Step>,
}

fn quote(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('\'');
    for c in name.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

fn is_identifier(name: &str) -> bool {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (unicode_ident::is_xid_start(first) || first == '_') && chars.all(unicode_ident::is_xid_continue)
}

impl Location {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn pop(&mut self) -> Option<Step> {
        self.steps.pop()
    }

    /// This location extended by one step.
    #[must_use]
    pub fn child(&self, step: Step) -> Location {
        let mut steps = self.steps.clone();
        steps.push(step);
        Location { steps }
    }

    /// Split into the parent location and the final step.
    pub fn split_last(&self) -> Option<(Location, &Step)> {
        let (last, parent) = self.steps.split_last()?;
        Some((
            Location {
                steps: parent.to_vec(),
            },
            last,
        ))
    }

    /// The equivalent path expression.
    pub fn to_path(&self) -> JsonPath {
        JsonPath {
            segments: self
                .steps
                .iter()
                .map(|step| match step {
                    Step::Key(k) => Segment::Field(k.clone()),
                    Step::Index(i) => Segment::Index(*i as i64),
                })
                .collect(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(k) => write!(f, "[{}]", quote(k)),
            Step::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) if is_identifier(name) => write!(f, ".{}", name),
            Segment::Field(name) => write!(f, "[{}]", quote(name)),
            Segment::Index(i) => write!(f, "[{}]", i),
            Segment::Wildcard => f.write_str("[*]"),
            Segment::Descendant(inner) => match inner.as_ref() {
                Segment::Field(name) if is_identifier(name) => write!(f, "..{}", name),
                Segment::Wildcard => f.write_str("..*"),
                other => write!(f, "..{}", other),
            },
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

struct Parser<'a> {
    expression: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(expression: &'a str) -> Self {
        Self {
            expression,
            chars: expression.char_indices().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> JsonError {
        let position = self
            .chars
            .get(self.pos)
            .map_or(self.expression.len(), |(offset, _)| *offset);
        JsonError::InvalidPath {
            expression: self.expression.to_string(),
            position,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expect(&mut self, expected: char) -> Result<(), JsonError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of path", expected))),
        }
    }

    fn parse(mut self) -> Result<JsonPath, JsonError> {
        let mut segments = Vec::new();

        if self.peek() == Some('$') {
            self.bump();
        } else if self.peek().is_some_and(|c| c != '.' && c != '[') {
            segments.push(self.dotted()?);
        }

        while let Some(c) = self.peek() {
            match c {
                '.' if self.peek_at(1) == Some('.') => {
                    self.pos += 2;
                    let inner = if self.peek() == Some('[') {
                        self.bracketed()?
                    } else {
                        self.dotted()?
                    };
                    segments.push(Segment::Descendant(Box::new(inner)));
                }
                '.' => {
                    self.bump();
                    segments.push(self.dotted()?);
                }
                '[' => segments.push(self.bracketed()?),
                other => {
                    return Err(self.error(format!("unexpected character '{}'", other)));
                }
            }
        }

        Ok(JsonPath { segments })
    }

    /// A `name` or `*` after a dot.
    fn dotted(&mut self) -> Result<Segment, JsonError> {
        if self.peek() == Some('*') {
            self.bump();
            return Ok(Segment::Wildcard);
        }

        let start = self.pos;
        while self.peek().is_some_and(|c| c != '.' && c != '[') {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().map(|(_, c)| c).collect();
        if name.is_empty() {
            return Err(self.error("empty member name"));
        }
        if !is_identifier(&name) {
            self.pos = start;
            return Err(self.error(format!(
                "member name '{}' must be an identifier; use ['{}'] instead",
                name, name
            )));
        }
        Ok(Segment::Field(name))
    }

    /// A `[...]` selector.
    fn bracketed(&mut self) -> Result<Segment, JsonError> {
        self.expect('[')?;
        let segment = match self.peek() {
            Some('*') => {
                self.bump();
                Segment::Wildcard
            }
            Some(delim @ ('\'' | '"')) => {
                self.bump();
                let mut name = String::new();
                loop {
                    match self.bump() {
                        Some('\\') => match self.bump() {
                            Some(escaped) => name.push(escaped),
                            None => return Err(self.error("unterminated escape")),
                        },
                        Some(c) if c == delim => break,
                        Some(c) => name.push(c),
                        None => return Err(self.error("unterminated quoted name")),
                    }
                }
                Segment::Field(name)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let start = self.pos;
                self.bump();
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                let digits: String = self.chars[start..self.pos].iter().map(|(_, c)| c).collect();
                let index = digits.parse::<i64>().map_err(|e| {
                    self.pos = start;
                    self.error(format!("invalid index '{}': {}", digits, e))
                })?;
                Segment::Index(index)
            }
            Some(c) => return Err(self.error(format!("unexpected character '{}' in brackets", c))),
            None => return Err(self.error("unterminated bracket")),
        };
        self.expect(']')?;
        Ok(segment)
    }
}

impl JsonPath {
    /// Parse a path expression.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use webcore_json::JsonPath;
    ///
    /// let path = JsonPath::parse("$.orders[0]['line items'][*].sku").unwrap();
    /// assert_eq!(path.len(), 5);
    ///
    /// // The root marker is optional.
    /// assert_eq!(JsonPath::parse("a.b").unwrap(), JsonPath::parse("$.a.b").unwrap());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, JsonError> {
        Parser::new(expression.trim()).parse()
    }

    /// The root path, selecting the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the path selects at most one location.
    pub fn is_definite(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Field(_) | Segment::Index(_)))
    }

    /// This path extended by a member selection.
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> JsonPath {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name.into()));
        JsonPath { segments }
    }

    /// This path extended by an element selection.
    #[must_use]
    pub fn index(&self, index: i64) -> JsonPath {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        JsonPath { segments }
    }

    /// Split into the parent path and the final segment.
    pub fn split_last(&self) -> Option<(JsonPath, &Segment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            JsonPath {
                segments: parent.to_vec(),
            },
            last,
        ))
    }
}

impl FromStr for JsonPath {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}

impl TryFrom<&str> for JsonPath {
    type Error = JsonError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        JsonPath::parse(s)
    }
}

impl From<&Location> for JsonPath {
    fn from(location: &Location) -> Self {
        location.to_path()
    }
}

/// Macro for path literals known to be valid.
///
/// # Example
///
/// ```rust
/// use webcore_json::jpath;
///
/// let p = jpath!("$.users[0].name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! jpath {
    ($s:expr) => {
        $crate::JsonPath::parse($s).expect("invalid path literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Segment {
        Segment::Field(name.to_string())
    }

    #[test]
    fn parse_basic_paths() {
        assert_eq!(JsonPath::parse("$").unwrap().len(), 0);
        assert_eq!(JsonPath::parse("").unwrap().len(), 0);
        assert_eq!(JsonPath::parse("foo").unwrap().segments, vec![field("foo")]);
        assert_eq!(
            JsonPath::parse("$.foo.bar").unwrap().segments,
            vec![field("foo"), field("bar")]
        );
    }

    #[test]
    fn parse_brackets() {
        let p = JsonPath::parse(r#"$['a b']["c"][2][-1][*]"#).unwrap();
        assert_eq!(
            p.segments,
            vec![
                field("a b"),
                field("c"),
                Segment::Index(2),
                Segment::Index(-1),
                Segment::Wildcard,
            ]
        );
    }

    #[test]
    fn parse_escapes_in_quotes() {
        let p = JsonPath::parse(r"$['it\'s']").unwrap();
        assert_eq!(p.segments, vec![field("it's")]);
    }

    #[test]
    fn parse_descendants() {
        let p = JsonPath::parse("$..price..*..['x y']").unwrap();
        assert_eq!(
            p.segments,
            vec![
                Segment::Descendant(Box::new(field("price"))),
                Segment::Descendant(Box::new(Segment::Wildcard)),
                Segment::Descendant(Box::new(field("x y"))),
            ]
        );
    }

    #[test]
    fn numeric_member_names_allowed() {
        let p = JsonPath::parse("items.0.name").unwrap();
        assert_eq!(p.segments, vec![field("items"), field("0"), field("name")]);
    }

    #[test]
    fn invalid_paths_rejected() {
        assert!(JsonPath::parse("$.").is_err());
        assert!(JsonPath::parse("$[").is_err());
        assert!(JsonPath::parse("$['open").is_err());
        assert!(JsonPath::parse("$[abc]").is_err());
        assert!(JsonPath::parse("$.bad-name").is_err());
        assert!(JsonPath::parse("$x").is_err());
        assert!(JsonPath::parse("$[1").is_err());
    }

    #[test]
    fn error_position_points_at_problem() {
        match JsonPath::parse("$.ok.bad-name").unwrap_err() {
            JsonError::InvalidPath { position, .. } => assert_eq!(position, 5),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn display_roundtrips() {
        for expr in ["$.a.b[0]", "$['a b'][*]", "$..x", "$..*", "$[-2]", "$..['a-b']"] {
            let p = JsonPath::parse(expr).unwrap();
            assert_eq!(JsonPath::parse(&p.to_string()).unwrap(), p, "{}", expr);
        }
        assert_eq!(JsonPath::parse("a['b c']").unwrap().to_string(), "$.a['b c']");
    }

    #[test]
    fn location_renders_quoted() {
        let loc = Location::root()
            .child(Step::Key("address".to_string()))
            .child(Step::Key("it's".to_string()))
            .child(Step::Index(2));
        assert_eq!(loc.to_string(), r"$['address']['it\'s'][2]");
        assert_eq!(Location::root().to_string(), "$");
    }

    #[test]
    fn location_parses_back() {
        let loc = Location::root()
            .child(Step::Key("a".to_string()))
            .child(Step::Index(1));
        let parsed = JsonPath::parse(&loc.to_string()).unwrap();
        assert_eq!(parsed, loc.to_path());
        assert!(parsed.is_definite());
    }

    #[test]
    fn builders_and_split() {
        let p = JsonPath::root().field("a").index(3);
        assert_eq!(p.to_string(), "$.a[3]");
        let (parent, last) = p.split_last().unwrap();
        assert_eq!(parent.to_string(), "$.a");
        assert_eq!(last, &Segment::Index(3));
        assert!(JsonPath::root().split_last().is_none());
    }

    #[test]
    fn macro_parses() {
        let p = jpath!("$.x[*]");
        assert!(!p.is_definite());
    }
}
