//! Validation rules stored as TOML.
//!
//! Each `[[rule]]` table names one builder check and its arguments:
//!
//! ```toml
//! [[rule]]
//! check = "is_number"
//!
//! [[rule]]
//! check = "between"
//! min = 1
//! max = 10
//!
//! [[rule]]
//! not = true
//! check = "equal"
//! value = 7
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::builder::ValidatorBuilder;
use crate::core::predicate::ValueKind;

/// Builder method a rule invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    Equal,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Between,
    IsOfType,
    IsNumber,
    IsString,
    IsObject,
    IsArray,
    HasProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Negate this rule only.
    #[serde(default)]
    pub not: bool,
    pub check: CheckName,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default)]
    pub kind: Option<ValueKind>,
    /// Exact length for `is_string`, minimum length for `is_array`.
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub properties: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default, rename = "rule")]
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Replay the rules, in file order, onto a fresh builder.
    pub fn to_builder(&self) -> Result<ValidatorBuilder> {
        let mut builder = ValidatorBuilder::new();
        for (index, rule) in self.rules.iter().enumerate() {
            apply_rule(&mut builder, rule).with_context(|| format!("rule {}", index + 1))?;
        }
        Ok(builder)
    }
}

fn apply_rule(builder: &mut ValidatorBuilder, rule: &Rule) -> Result<()> {
    if rule.not {
        builder.not();
    }
    match rule.check {
        CheckName::Equal => builder.equal(required(&rule.value, "value")?),
        CheckName::GreaterThan => builder.greater_than(required(&rule.value, "value")?),
        CheckName::GreaterOrEqual => builder.greater_or_equal(required(&rule.value, "value")?),
        CheckName::LessThan => builder.less_than(required(&rule.value, "value")?),
        CheckName::LessOrEqual => builder.less_or_equal(required(&rule.value, "value")?),
        CheckName::Between => builder.between(
            required(&rule.min, "min")?,
            required(&rule.max, "max")?,
        ),
        CheckName::IsOfType => builder.is_of_type(required(&rule.kind, "kind")?),
        CheckName::IsNumber => builder.is_number(),
        CheckName::IsString => builder.is_string(rule.length),
        CheckName::IsObject => builder.is_object(),
        CheckName::IsArray => builder.is_array(rule.length),
        CheckName::HasProperties => {
            builder.has_properties(required(&rule.properties, "properties")?)
        }
    };
    Ok(())
}

fn required<T: Clone>(field: &Option<T>, name: &str) -> Result<T> {
    field
        .clone()
        .ok_or_else(|| anyhow!("missing `{name}` argument"))
}

pub fn parse_rules(contents: &str) -> Result<RuleSet> {
    toml::from_str(contents).context("parse rules toml")
}

/// Load a rules file and build its validator.
pub fn load_rules(path: &Path) -> Result<ValidatorBuilder> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let rules = parse_rules(&contents).with_context(|| format!("parse {}", path.display()))?;
    rules.to_builder()
}
