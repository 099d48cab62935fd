use std::fmt;

use crate::{Location, Step};

/// A failure recorded during a validation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub location: Location,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Tracks where in the document validation currently is, and collects
/// every error raised along the way.
///
/// Nesting is an explicit stack: validators call `push_field` or
/// `push_index` before descending and `pop` afterwards.
#[derive(Clone, Debug, Default)]
pub struct ValidationContext {
    location: Location,
    errors: Vec<ValidationError>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, name: impl Into<String>) {
        self.location.push(Step::Key(name.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.location.push(Step::Index(index));
    }

    pub fn pop(&mut self) {
        self.location.pop();
    }

    /// The location currently being validated.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Record an error at the current location.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ValidationError {
            location: self.location.clone(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// A scratch context at the same location with no errors recorded.
    ///
    /// Used to try an alternative without committing its failures.
    pub fn fork(&self) -> ValidationContext {
        ValidationContext {
            location: self.location.clone(),
            errors: Vec::new(),
        }
    }

    /// Append the errors of a forked context.
    pub fn absorb(&mut self, other: ValidationContext) {
        self.errors.extend(other.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn errors_carry_current_location() {
        let mut ctx = ValidationContext::new();
        ctx.push_field("users");
        ctx.push_index(2);
        ctx.push_field("name");
        ctx.error("too short");
        ctx.pop();
        ctx.error("incomplete");
        ctx.pop();
        ctx.pop();

        assert!(ctx.location().is_root());
        let rendered: Vec<String> = ctx.errors().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "$['users'][2]['name']: too short",
                "$['users'][2]: incomplete"
            ]
        );
    }

    #[test]
    fn fork_starts_clean() {
        let mut ctx = ValidationContext::new();
        ctx.push_field("a");
        ctx.error("first");

        let mut scratch = ctx.fork();
        assert!(scratch.is_valid());
        assert_eq!(scratch.location(), ctx.location());
        scratch.error("second");

        ctx.absorb(scratch);
        assert_eq!(ctx.errors().len(), 2);
    }

    #[test]
    fn pop_at_root_is_harmless() {
        let mut ctx = ValidationContext::new();
        ctx.pop();
        assert!(ctx.location().is_root());
    }

    proptest! {
        #[test]
        fn balanced_push_pop_restores_location(names in prop::collection::vec("[a-z]{1,5}", 0..8)) {
            let mut ctx = ValidationContext::new();
            ctx.push_field("base");
            let before = ctx.location().clone();
            for (i, name) in names.iter().enumerate() {
                if i % 2 == 0 {
                    ctx.push_field(name.as_str());
                } else {
                    ctx.push_index(i);
                }
            }
            for _ in &names {
                ctx.pop();
            }
            prop_assert_eq!(ctx.location(), &before);
        }
    }
}
