//! Structural validation of JSON documents.
//!
//! Validators never raise: every failure is recorded in a
//! [`ValidationContext`] together with the location of the offending value,
//! and `validate` reports overall success.
//!
//! ```rust
//! use webcore_json::validate::{self, IntegerPredicate, ObjectValidator, StringValidator};
//! use webcore_json::JsonValue;
//!
//! let schema = ObjectValidator::new()
//!     .required("name", StringValidator::new().min_len(1))
//!     .required("age", IntegerPredicate::non_negative());
//!
//! let doc = JsonValue::parse(r#"{"name": "Ada"}"#).unwrap();
//! let errors = validate::check(&schema, &doc).unwrap_err();
//! assert_eq!(errors[0].to_string(), "$: missing required attribute 'age'");
//! ```

mod composite;
mod context;
mod scalar;

use std::sync::Arc;

pub use composite::{ArrayValidator, MatchMode, MultiTypeValidator, ObjectValidator};
pub use context::{ValidationContext, ValidationError};
pub use scalar::{
    AcceptAll, IntegerPredicate, NumberValidator, RejectAll, StringValidator, TypeValidator,
};

use crate::JsonValue;

/// A structural check over a JSON value.
pub trait Validator: Send + Sync {
    /// Validate `value`, recording failures in `ctx`.
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool;

    /// A short human-readable description of what is accepted.
    fn describe(&self) -> String;
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        (**self).validate(value, ctx)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<V: Validator + ?Sized> Validator for Arc<V> {
    fn validate(&self, value: &JsonValue, ctx: &mut ValidationContext) -> bool {
        (**self).validate(value, ctx)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Run a full validation pass from the document root.
pub fn check(validator: &dyn Validator, value: &JsonValue) -> Result<(), Vec<ValidationError>> {
    let mut ctx = ValidationContext::new();
    validator.validate(value, &mut ctx);
    if ctx.is_valid() {
        Ok(())
    } else {
        Err(ctx.into_errors())
    }
}
