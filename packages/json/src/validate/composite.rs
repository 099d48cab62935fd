//! Validators built from other validators.

use indexmap::IndexMap;

use super::{ValidationContext, Validator};
use crate::JsonValue;

struct Attribute {
    validator: Box<dyn Validator>,
    required: bool,
}

/// Validates an object attribute by attribute.
///
/// A single pass reports every missing required attribute, every
/// unrecognized attribute (unless unknown attributes are allowed) and every
/// attribute-level failure.
#[derive(Default)]
pub struct ObjectValidator {
    attributes: IndexMap<String, Attribute>,
    allow_unknown: bool,
}

impl ObjectValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.attributes.insert(
            name.into(),
            Attribute {
                validator: Box::new(validator),
                required: true,
            },
        );
        self
    }

    pub fn optional(mut self, name: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.attributes.insert(
            name.into(),
            Attribute {
                validator: Box::new(validator),
                required: false,
            },
        );
        self
    }

    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }
}

impl Validator for ObjectValidator {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        let Some(obj) = value.as_object() else {
            ctx.error(format!("expected object, found {}", value.json_type()));
            return false;
        };

        let mut ok = true;
        for (name, attribute) in &self.attributes {
            if attribute.required && !obj.contains_key(name) {
                ctx.error(format!("missing required attribute '{}'", name));
                ok = false;
            }
        }

        for (name, entry) in obj {
            ctx.push_field(name.as_str());
            match self.attributes.get(name) {
                Some(attribute) => {
                    if !attribute.validator.validate(entry, ctx) {
                        ok = false;
                    }
                }
                None if self.allow_unknown => {}
                None => {
                    ctx.error(format!("unrecognized attribute '{}'", name));
                    ok = false;
                }
            }
            ctx.pop();
        }
        ok
    }

    fn describe(&self) -> String {
        let names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        format!("object with {{{}}}", names.join(", "))
    }
}

/// Validates every element of an array, plus optional length bounds.
#[derive(Default)]
pub struct ArrayValidator {
    element: Option<Box<dyn Validator>>,
    min_len: Option<usize>,
    max_len: Option<usize>,
}

impl ArrayValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every element must satisfy `validator`.
    pub fn of(validator: impl Validator + 'static) -> Self {
        Self {
            element: Some(Box::new(validator)),
            ..Self::default()
        }
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

impl Validator for ArrayValidator {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        let Some(arr) = value.as_array() else {
            ctx.error(format!("expected array, found {}", value.json_type()));
            return false;
        };

        let mut ok = true;
        if let Some(min) = self.min_len {
            if arr.len() < min {
                ctx.error(format!("array has fewer than {} elements", min));
                ok = false;
            }
        }
        if let Some(max) = self.max_len {
            if arr.len() > max {
                ctx.error(format!("array has more than {} elements", max));
                ok = false;
            }
        }
        if let Some(element) = &self.element {
            for (index, item) in arr.iter().enumerate() {
                ctx.push_index(index);
                if !element.validate(item, ctx) {
                    ok = false;
                }
                ctx.pop();
            }
        }
        ok
    }

    fn describe(&self) -> String {
        match &self.element {
            Some(element) => format!("array of {}", element.describe()),
            None => "array".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Satisfied by the first validator that accepts.
    Any,
    /// Fails at the first validator that rejects.
    All,
}

/// Combines validators under a [`MatchMode`].
pub struct MultiTypeValidator {
    mode: MatchMode,
    validators: Vec<Box<dyn Validator>>,
}

impl MultiTypeValidator {
    pub fn new(mode: MatchMode, validators: Vec<Box<dyn Validator>>) -> Self {
        Self { mode, validators }
    }

    pub fn any(validators: Vec<Box<dyn Validator>>) -> Self {
        Self::new(MatchMode::Any, validators)
    }

    pub fn all(validators: Vec<Box<dyn Validator>>) -> Self {
        Self::new(MatchMode::All, validators)
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl Validator for MultiTypeValidator {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        match self.mode {
            MatchMode::Any => {
                for validator in &self.validators {
                    let mut scratch = ctx.fork();
                    if validator.validate(value, &mut scratch) {
                        return true;
                    }
                }
                ctx.error(format!("expected {}", self.describe()));
                false
            }
            MatchMode::All => {
                for validator in &self.validators {
                    if !validator.validate(value, ctx) {
                        return false;
                    }
                }
                true
            }
        }
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.validators.iter().map(|v| v.describe()).collect();
        match self.mode {
            MatchMode::Any => format!("any of [{}]", parts.join(", ")),
            MatchMode::All => format!("all of [{}]", parts.join(", ")),
        }
    }
}
