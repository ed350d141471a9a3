//! Top-level validation entry point.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::core::builder::ValidatorBuilder;
use crate::core::predicate::Predicate;
use crate::error::{BAD_REQUEST, ValidationError};

/// Something that yields one effective predicate.
pub trait Validation {
    fn effective(&self) -> Cow<'_, Predicate>;
}

impl Validation for Predicate {
    fn effective(&self) -> Cow<'_, Predicate> {
        Cow::Borrowed(self)
    }
}

impl Validation for ValidatorBuilder {
    fn effective(&self) -> Cow<'_, Predicate> {
        Cow::Owned(self.fold())
    }
}

/// Check `value` against a predicate or a builder. Success is silent.
pub fn validate<V>(value: &Value, validator: &V) -> Result<(), ValidationError>
where
    V: Validation + ?Sized,
{
    let predicate = validator.effective();
    if predicate.test(value) {
        return Ok(());
    }
    debug!(description = predicate.description(), "validation failed");
    Err(ValidationError {
        status: BAD_REQUEST,
        value: value.to_string(),
        description: predicate.description().to_string(),
    })
}
