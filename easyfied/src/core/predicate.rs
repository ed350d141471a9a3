//! Named boolean tests over JSON values.
//!
//! A [`Predicate`] pairs a [`Check`] with the human-readable clause reported when
//! the check fails. Descriptions are rendered once, at construction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dynamic type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(ValueKind::Null),
            "boolean" => Ok(ValueKind::Boolean),
            "number" => Ok(ValueKind::Number),
            "string" => Ok(ValueKind::String),
            "array" => Ok(ValueKind::Array),
            "object" => Ok(ValueKind::Object),
            other => Err(anyhow!("unknown value kind '{other}'")),
        }
    }
}

type CustomTest = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// The test a [`Predicate`] performs.
#[derive(Clone)]
pub enum Check {
    /// Always passes.
    True,
    Equal(Value),
    GreaterThan(Value),
    GreaterOrEqual(Value),
    LessThan(Value),
    LessOrEqual(Value),
    /// Inclusive on both ends.
    Between(Value, Value),
    OfKind(ValueKind),
    /// String with exactly this many characters.
    StringOfLength(usize),
    /// Array with at least `min_len` elements, when set.
    Array { min_len: Option<usize> },
    HasProperties(Vec<String>),
    Not(Box<Predicate>),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Custom(CustomTest),
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::True => f.write_str("True"),
            Check::Equal(v) => f.debug_tuple("Equal").field(v).finish(),
            Check::GreaterThan(v) => f.debug_tuple("GreaterThan").field(v).finish(),
            Check::GreaterOrEqual(v) => f.debug_tuple("GreaterOrEqual").field(v).finish(),
            Check::LessThan(v) => f.debug_tuple("LessThan").field(v).finish(),
            Check::LessOrEqual(v) => f.debug_tuple("LessOrEqual").field(v).finish(),
            Check::Between(lo, hi) => f.debug_tuple("Between").field(lo).field(hi).finish(),
            Check::OfKind(kind) => f.debug_tuple("OfKind").field(kind).finish(),
            Check::StringOfLength(len) => f.debug_tuple("StringOfLength").field(len).finish(),
            Check::Array { min_len } => f.debug_struct("Array").field("min_len", min_len).finish(),
            Check::HasProperties(names) => f.debug_tuple("HasProperties").field(names).finish(),
            Check::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Check::And(children) => f.debug_tuple("And").field(children).finish(),
            Check::Or(children) => f.debug_tuple("Or").field(children).finish(),
            Check::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A boolean test with the description of the condition it checks.
#[derive(Debug, Clone)]
pub struct Predicate {
    check: Check,
    description: String,
}

impl Predicate {
    pub(crate) fn new(check: Check, description: impl Into<String>) -> Self {
        Self {
            check,
            description: description.into(),
        }
    }

    /// Wrap a caller-supplied test.
    pub fn custom<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(Check::Custom(Arc::new(test)), description)
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Apply the test. Non-comparable inputs yield `false`, never a panic.
    pub fn test(&self, value: &Value) -> bool {
        match &self.check {
            Check::True => true,
            Check::Equal(expected) => values_equal(value, expected),
            Check::GreaterThan(bound) => compare(value, bound).is_some_and(Ordering::is_gt),
            Check::GreaterOrEqual(bound) => compare(value, bound).is_some_and(Ordering::is_ge),
            Check::LessThan(bound) => compare(value, bound).is_some_and(Ordering::is_lt),
            Check::LessOrEqual(bound) => compare(value, bound).is_some_and(Ordering::is_le),
            Check::Between(lo, hi) => {
                compare(value, hi).is_some_and(Ordering::is_le)
                    && compare(value, lo).is_some_and(Ordering::is_ge)
            }
            Check::OfKind(kind) => ValueKind::of(value) == *kind,
            Check::StringOfLength(len) => value
                .as_str()
                .is_some_and(|s| s.chars().count() == *len),
            Check::Array { min_len } => value
                .as_array()
                .is_some_and(|items| min_len.is_none_or(|min| items.len() >= min)),
            Check::HasProperties(names) => value
                .as_object()
                .is_some_and(|map| names.iter().all(|name| map.contains_key(name))),
            Check::Not(inner) => !inner.test(value),
            Check::And(children) => children.iter().all(|p| p.test(value)),
            Check::Or(children) => children.iter().any(|p| p.test(value)),
            Check::Custom(test) => test(value),
        }
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// Numbers order numerically and strings lexicographically; anything else is
/// non-comparable.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}
