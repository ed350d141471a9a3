//! Factory functions building [`Predicate`]s.
//!
//! Every factory renders its description up front; composite predicates join
//! their children's descriptions with a connective label, one child per line.

use serde_json::Value;

use crate::core::predicate::{Check, Predicate, ValueKind};

/// Always passes; empty description.
pub fn always() -> Predicate {
    Predicate::new(Check::True, "")
}

pub fn equal(expected: impl Into<Value>) -> Predicate {
    let expected = expected.into();
    let description = format!("equal to {expected}");
    Predicate::new(Check::Equal(expected), description)
}

pub fn greater_than(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    let description = format!("greater than {}", bare(&bound));
    Predicate::new(Check::GreaterThan(bound), description)
}

pub fn greater_or_equal(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    let description = format!("greater than or equal to {}", bare(&bound));
    Predicate::new(Check::GreaterOrEqual(bound), description)
}

pub fn less_than(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    let description = format!("less than {}", bare(&bound));
    Predicate::new(Check::LessThan(bound), description)
}

pub fn less_or_equal(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    let description = format!("less than or equal to {}", bare(&bound));
    Predicate::new(Check::LessOrEqual(bound), description)
}

/// Inclusive range check.
pub fn between(min: impl Into<Value>, max: impl Into<Value>) -> Predicate {
    let (min, max) = (min.into(), max.into());
    let description = format!("between {} and {}", bare(&min), bare(&max));
    Predicate::new(Check::Between(min, max), description)
}

/// Strings print without quotes; only `equal` quotes its operand.
fn bare(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn is_of_type(kind: ValueKind) -> Predicate {
    Predicate::new(Check::OfKind(kind), format!("of type {kind}"))
}

pub fn is_number() -> Predicate {
    is_of_type(ValueKind::Number)
}

/// Any string when `length` is `None`, otherwise a string of exactly that many
/// characters.
pub fn is_string(length: Option<usize>) -> Predicate {
    match length {
        Some(len) => Predicate::new(
            Check::StringOfLength(len),
            format!("a string of length: {len}"),
        ),
        None => is_of_type(ValueKind::String),
    }
}

pub fn is_object() -> Predicate {
    is_of_type(ValueKind::Object)
}

/// Any array when `min_len` is `None`, otherwise an array with at least
/// `min_len` elements.
pub fn is_array(min_len: Option<usize>) -> Predicate {
    let description = match min_len {
        Some(min) => format!("an array of minimal length: {min}"),
        None => "an array".to_string(),
    };
    Predicate::new(Check::Array { min_len }, description)
}

/// Every named key must be present on an object value.
pub fn has_properties<I, S>(names: I) -> Predicate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    let description = format!("have properties: {}", Value::from(names.clone()));
    Predicate::new(Check::HasProperties(names), description)
}

pub fn not(inner: Predicate) -> Predicate {
    let description = format!("NOT : \n {}", inner.description());
    Predicate::new(Check::Not(Box::new(inner)), description)
}

/// Passes when every child passes. An empty list passes.
pub fn and(children: Vec<Predicate>) -> Predicate {
    let description = joined_description("AND : ", &children);
    Predicate::new(Check::And(children), description)
}

/// Passes when any child passes. An empty list fails.
pub fn or(children: Vec<Predicate>) -> Predicate {
    let description = joined_description("OR : ", &children);
    Predicate::new(Check::Or(children), description)
}

fn joined_description(label: &str, children: &[Predicate]) -> String {
    let mut description = label.to_string();
    for child in children {
        description.push_str("\n- ");
        description.push_str(child.description());
        description.push(' ');
    }
    description
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use serde_json::json;

    #[test]
    fn comparisons_follow_numeric_order() {
        assert!(greater_than(5).test(&json!(10)));
        assert!(!greater_than(5).test(&json!(5)));
        assert!(greater_or_equal(5).test(&json!(5)));
        assert!(less_than(5).test(&json!(4.5)));
        assert!(!less_than(5).test(&json!(5)));
        assert!(less_or_equal(5).test(&json!(5)));
    }

    #[test]
    fn comparisons_on_non_comparable_values_fail() {
        assert!(!greater_than(5).test(&json!("10")));
        assert!(!less_than(5).test(&json!(null)));
        assert!(!between(1, 3).test(&json!([2])));
    }

    #[test]
    fn strings_compare_lexicographically() {
        assert!(greater_than("apple").test(&json!("banana")));
        assert!(!greater_than("banana").test(&json!("apple")));
    }

    #[test]
    fn string_bounds_print_unquoted() {
        assert_eq!(greater_than("apple").description(), "greater than apple");
        assert_eq!(less_or_equal("m").description(), "less than or equal to m");
        assert_eq!(between("a", "f").description(), "between a and f");
    }

    #[test]
    fn between_is_inclusive() {
        let range = between(1, 3);
        assert!(range.test(&json!(1)));
        assert!(range.test(&json!(3)));
        assert!(!range.test(&json!(0)));
        assert!(!range.test(&json!(4)));
        assert_eq!(range.description(), "between 1 and 3");
    }

    #[test]
    fn equal_quotes_string_operands() {
        assert_eq!(equal("abc").description(), "equal to \"abc\"");
        assert_eq!(equal(7).description(), "equal to 7");
        assert!(equal("abc").test(&json!("abc")));
        assert!(!equal(7).test(&json!("7")));
    }

    #[test]
    fn type_checks_match_tags() {
        assert!(is_number().test(&json!(3)));
        assert!(!is_number().test(&json!("3")));
        assert!(is_object().test(&json!({})));
        assert!(!is_object().test(&json!([])));
        assert!(!is_object().test(&json!(null)));
        assert_eq!(is_number().description(), "of type number");
    }

    #[test]
    fn is_string_checks_exact_length() {
        assert!(is_string(None).test(&json!("")));
        assert!(is_string(Some(3)).test(&json!("abc")));
        assert!(!is_string(Some(3)).test(&json!("abcd")));
        assert!(!is_string(Some(3)).test(&json!(123)));
        assert_eq!(is_string(Some(3)).description(), "a string of length: 3");
        assert_eq!(is_string(None).description(), "of type string");
    }

    #[test]
    fn is_array_checks_minimum_length() {
        let arr = is_array(Some(3));
        assert!(arr.test(&json!([1, 2, 3])));
        assert!(arr.test(&json!([1, 2, 3, 4])));
        assert!(!arr.test(&json!([1, 2])));
        assert!(!arr.test(&json!({"0": 1, "1": 2, "2": 3})));
        assert!(is_array(None).test(&json!([])));
        assert_eq!(arr.description(), "an array of minimal length: 3");
        assert_eq!(is_array(None).description(), "an array");
    }

    #[test]
    fn has_properties_requires_every_key() {
        let props = has_properties(["a", "b"]);
        assert!(props.test(&json!({"a": 1, "b": 2, "c": 3})));
        assert!(props.test(&json!({"a": null, "b": false})));
        assert!(!props.test(&json!({"a": 1})));
        assert!(!props.test(&json!("ab")));
        assert_eq!(props.description(), "have properties: [\"a\",\"b\"]");
    }

    #[test]
    fn not_inverts_and_labels() {
        let p = not(is_number());
        assert!(p.test(&json!("x")));
        assert!(!p.test(&json!(1)));
        assert_eq!(p.description(), "NOT : \n of type number");
    }

    #[test]
    fn double_negation_evaluates_like_original() {
        let inputs = [json!(1), json!("1"), json!(null), json!([1]), json!({"a": 1})];
        let base = greater_than(0);
        let twice = not(not(greater_than(0)));
        for input in &inputs {
            assert_eq!(twice.test(input), base.test(input), "input {input}");
        }
    }

    #[test]
    fn and_or_descriptions_list_children() {
        let p = and(vec![is_number(), greater_than(5)]);
        assert_eq!(
            p.description(),
            "AND : \n- of type number \n- greater than 5 "
        );
        let q = or(vec![is_number(), is_string(None)]);
        assert_eq!(q.description(), "OR : \n- of type number \n- of type string ");
        assert!(q.test(&json!("x")));
        assert!(!q.test(&json!(null)));
    }

    #[test]
    fn empty_and_passes_empty_or_fails() {
        assert!(and(Vec::new()).test(&json!(1)));
        assert!(!or(Vec::new()).test(&json!(1)));
    }

    #[test]
    fn and_short_circuits_on_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let counted = Predicate::custom("counted", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        let p = and(vec![is_number(), counted.clone()]);
        assert!(!p.test(&json!("x")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let q = or(vec![is_string(None), counted]);
        assert!(q.test(&json!("x")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn always_passes_with_empty_description() {
        let p = always();
        assert!(p.test(&json!(null)));
        assert_eq!(p.description(), "");
    }
}
