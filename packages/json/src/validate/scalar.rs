//! Single-purpose validators.

use regex::Regex;

use super::{ValidationContext, Validator};
use crate::{JsonType, JsonValue};

/// Checks that a value coerces to a kind.
#[derive(Clone, Copy, Debug)]
pub struct TypeValidator(pub JsonType);

impl TypeValidator {
    pub fn boolean() -> Self {
        TypeValidator(JsonType::Boolean)
    }

    pub fn null() -> Self {
        TypeValidator(JsonType::Null)
    }
}

impl Validator for TypeValidator {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        if self.0.matches(value) {
            return true;
        }
        ctx.error(format!("expected {}, found {}", self.0, value.json_type()));
        false
    }

    fn describe(&self) -> String {
        self.0.to_string()
    }
}

/// String checks: pattern, length bounds and an optional set of allowed
/// values. Lengths count characters, not bytes.
#[derive(Clone, Debug, Default)]
pub struct StringValidator {
    pattern: Option<(String, Regex)>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    allowed: Option<Vec<String>>,
}

impl StringValidator {
    /// Accepts any string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts strings matching `pattern` in full.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Self::new().pattern(pattern)
    }

    /// Accepts exactly the given values.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})$", pattern))?;
        self.pattern = Some((pattern.to_string(), anchored));
        Ok(self)
    }

    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }
}

impl Validator for StringValidator {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        let Some(s) = value.as_str() else {
            ctx.error(format!("expected string, found {}", value.json_type()));
            return false;
        };

        let mut ok = true;
        let len = s.chars().count();
        if let Some(min) = self.min_len {
            if len < min {
                ctx.error(format!("string shorter than {} characters", min));
                ok = false;
            }
        }
        if let Some(max) = self.max_len {
            if len > max {
                ctx.error(format!("string longer than {} characters", max));
                ok = false;
            }
        }
        if let Some((source, regex)) = &self.pattern {
            if !regex.is_match(s) {
                ctx.error(format!("string does not match /{}/", source));
                ok = false;
            }
        }
        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|a| a == s) {
                ctx.error(format!("'{}' is not one of [{}]", s, allowed.join(", ")));
                ok = false;
            }
        }
        ok
    }

    fn describe(&self) -> String {
        match (&self.pattern, &self.allowed) {
            (Some((source, _)), _) => format!("string matching /{}/", source),
            (None, Some(allowed)) => format!("one of [{}]", allowed.join(", ")),
            (None, None) => "string".to_string(),
        }
    }
}

type IntPredicate = Box<dyn Fn(i64) -> bool + Send + Sync>;

/// An integer satisfying a named predicate.
pub struct IntegerPredicate {
    description: String,
    predicate: IntPredicate,
}

impl IntegerPredicate {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(i64) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn positive() -> Self {
        Self::new("positive integer", |n| n > 0)
    }

    pub fn non_negative() -> Self {
        Self::new("non-negative integer", |n| n >= 0)
    }

    /// Inclusive on both ends.
    pub fn range(min: i64, max: i64) -> Self {
        Self::new(format!("integer in {}..={}", min, max), move |n| {
            (min..=max).contains(&n)
        })
    }
}

impl std::fmt::Debug for IntegerPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegerPredicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Validator for IntegerPredicate {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        match value.as_i64() {
            Some(n) if (self.predicate)(n) => true,
            Some(n) => {
                ctx.error(format!("{} is not a {}", n, self.description));
                false
            }
            None => {
                ctx.error(format!(
                    "expected {}, found {}",
                    self.description,
                    value.json_type()
                ));
                false
            }
        }
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

type FloatPredicate = Box<dyn Fn(f64) -> bool + Send + Sync>;

/// A finite number within optional inclusive bounds and an optional
/// named predicate.
#[derive(Default)]
pub struct NumberValidator {
    min: Option<f64>,
    max: Option<f64>,
    predicate: Option<(String, FloatPredicate)>,
}

impl NumberValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self::new().min(min).max(max)
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn predicate<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some((description.into(), Box::new(predicate)));
        self
    }
}

impl std::fmt::Debug for NumberValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberValidator")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("predicate", &self.predicate.as_ref().map(|(d, _)| d))
            .finish()
    }
}

impl Validator for NumberValidator {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        let Some(n) = value.as_f64() else {
            ctx.error(format!("expected number, found {}", value.json_type()));
            return false;
        };

        let mut ok = true;
        if let Some(min) = self.min {
            if n < min {
                ctx.error(format!("{} is less than {}", n, min));
                ok = false;
            }
        }
        if let Some(max) = self.max {
            if n > max {
                ctx.error(format!("{} is greater than {}", n, max));
                ok = false;
            }
        }
        if let Some((description, predicate)) = &self.predicate {
            if !predicate(n) {
                ctx.error(format!("{} is not {}", n, description));
                ok = false;
            }
        }
        ok
    }

    fn describe(&self) -> String {
        match (&self.predicate, self.min, self.max) {
            (Some((description, _)), _, _) => description.clone(),
            (None, Some(min), Some(max)) => format!("number in [{}, {}]", min, max),
            (None, Some(min), None) => format!("number >= {}", min),
            (None, None, Some(max)) => format!("number <= {}", max),
            (None, None, None) => "number".to_string(),
        }
    }
}

/// Accepts everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _value: &JsonValue, _ctx: &mut ValidationContext) -> bool {
        true
    }

    fn describe(&self) -> String {
        "anything".to_string()
    }
}

/// Rejects everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectAll;

impl Validator for RejectAll {
    fn validate(&self, _value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        ctx.error("no value is allowed here");
        false
    }

    fn describe(&self) -> String {
        "nothing".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(validator: &dyn Validator, value: JsonValue) -> (bool, Vec<String>) {
        let mut ctx = ValidationContext::new();
        let ok = validator.validate(&value, &mut ctx);
        (ok, ctx.errors().iter().map(|e| e.message.clone()).collect())
    }

    #[test]
    fn type_check() {
        assert!(run(&TypeValidator(JsonType::Integer), JsonValue::from(5)).0);
        let (ok, errors) = run(&TypeValidator(JsonType::Integer), JsonValue::from(5_000_000_000i64));
        assert!(!ok);
        assert_eq!(errors, vec!["expected integer, found long"]);
        assert!(run(&TypeValidator::boolean(), JsonValue::from(false)).0);
        assert!(run(&TypeValidator::null(), JsonValue::Null).0);
    }

    #[test]
    fn string_pattern_is_anchored() {
        let v = StringValidator::regex("[a-z]+").unwrap();
        assert!(run(&v, JsonValue::from("abc")).0);
        assert!(!run(&v, JsonValue::from("abc1")).0);
        assert!(!run(&v, JsonValue::from(1)).0);
        assert!(StringValidator::regex("(").is_err());
    }

    #[test]
    fn string_lengths_count_characters() {
        let v = StringValidator::new().min_len(2).max_len(3);
        assert!(run(&v, JsonValue::from("éé")).0);
        assert!(!run(&v, JsonValue::from("é")).0);
        let (ok, errors) = run(&v, JsonValue::from("abcd"));
        assert!(!ok);
        assert_eq!(errors, vec!["string longer than 3 characters"]);
    }

    #[test]
    fn string_enumeration() {
        let v = StringValidator::one_of(["red", "green"]);
        assert!(run(&v, JsonValue::from("red")).0);
        let (ok, errors) = run(&v, JsonValue::from("blue"));
        assert!(!ok);
        assert_eq!(errors, vec!["'blue' is not one of [red, green]"]);
    }

    #[test]
    fn integer_predicates() {
        assert!(run(&IntegerPredicate::positive(), JsonValue::from(3)).0);
        assert!(!run(&IntegerPredicate::positive(), JsonValue::from(0)).0);
        assert!(!run(&IntegerPredicate::positive(), JsonValue::from(1.5)).0);
        assert!(!run(&IntegerPredicate::positive(), JsonValue::from("3")).0);
        assert!(run(&IntegerPredicate::range(1, 3), JsonValue::from(3)).0);
        assert!(!run(&IntegerPredicate::range(1, 3), JsonValue::from(4)).0);
    }

    #[test]
    fn number_bounds_and_predicate() {
        let v = NumberValidator::range(0.0, 1.0);
        assert!(run(&v, JsonValue::from(0.5)).0);
        assert!(run(&v, JsonValue::from(1)).0);
        assert!(!run(&v, JsonValue::from(1.5)).0);
        assert!(!run(&v, JsonValue::from(f64::NAN)).0);

        let even = NumberValidator::new().predicate("even", |n| n % 2.0 == 0.0);
        assert!(run(&even, JsonValue::from(4)).0);
        let (ok, errors) = run(&even, JsonValue::from(3));
        assert!(!ok);
        assert_eq!(errors, vec!["3 is not even"]);
    }

    #[test]
    fn always_and_never() {
        assert!(run(&AcceptAll, JsonValue::Null).0);
        assert!(!run(&RejectAll, JsonValue::Null).0);
    }
}
