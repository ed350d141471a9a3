//! Chainable accumulation of predicates.

use serde_json::Value;

use crate::core::combinators;
use crate::core::predicate::{Predicate, ValueKind};

/// Collects predicates in order and folds them into one.
///
/// [`ValidatorBuilder::not`] negates only the next appended predicate; toggling
/// twice cancels out.
#[derive(Debug, Clone, Default)]
pub struct ValidatorBuilder {
    instructions: Vec<Predicate>,
    negate_next: bool,
}

/// Start an empty builder.
pub fn validator() -> ValidatorBuilder {
    ValidatorBuilder::new()
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not(&mut self) -> &mut Self {
        self.negate_next = !self.negate_next;
        self
    }

    /// Append a predicate, consuming any pending negation.
    pub fn with(&mut self, predicate: Predicate) -> &mut Self {
        let predicate = if std::mem::take(&mut self.negate_next) {
            combinators::not(predicate)
        } else {
            predicate
        };
        self.instructions.push(predicate);
        self
    }

    pub fn equal(&mut self, expected: impl Into<Value>) -> &mut Self {
        self.with(combinators::equal(expected))
    }

    pub fn greater_than(&mut self, bound: impl Into<Value>) -> &mut Self {
        self.with(combinators::greater_than(bound))
    }

    pub fn greater_or_equal(&mut self, bound: impl Into<Value>) -> &mut Self {
        self.with(combinators::greater_or_equal(bound))
    }

    pub fn less_than(&mut self, bound: impl Into<Value>) -> &mut Self {
        self.with(combinators::less_than(bound))
    }

    pub fn less_or_equal(&mut self, bound: impl Into<Value>) -> &mut Self {
        self.with(combinators::less_or_equal(bound))
    }

    pub fn between(&mut self, min: impl Into<Value>, max: impl Into<Value>) -> &mut Self {
        self.with(combinators::between(min, max))
    }

    pub fn is_of_type(&mut self, kind: ValueKind) -> &mut Self {
        self.with(combinators::is_of_type(kind))
    }

    pub fn is_number(&mut self) -> &mut Self {
        self.with(combinators::is_number())
    }

    pub fn is_string(&mut self, length: Option<usize>) -> &mut Self {
        self.with(combinators::is_string(length))
    }

    pub fn is_object(&mut self) -> &mut Self {
        self.with(combinators::is_object())
    }

    pub fn is_array(&mut self, min_len: Option<usize>) -> &mut Self {
        self.with(combinators::is_array(min_len))
    }

    pub fn has_properties<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(combinators::has_properties(names))
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Fold the accumulated predicates: none passes everything, one is returned
    /// as is, several are AND-joined in insertion order.
    pub fn fold(&self) -> Predicate {
        match self.instructions.as_slice() {
            [] => combinators::always(),
            [single] => single.clone(),
            many => combinators::and(many.to_vec()),
        }
    }

    pub fn evaluate(&self, value: &Value) -> bool {
        self.fold().test(value)
    }
}
