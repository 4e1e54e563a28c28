use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Comparison applied by a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    /// Any operator name this engine does not know. Always evaluates to `false`.
    #[serde(other)]
    Unknown,
}

impl ConditionOperator {
    /// Parses an operator name, mapping unrecognised names to [`ConditionOperator::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "contains" => Self::Contains,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "is_empty" => Self::IsEmpty,
            "is_not_empty" => Self::IsNotEmpty,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the operator ignores the condition's comparison value.
    pub fn is_emptiness_check(&self) -> bool {
        matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar a condition compares the runtime field value against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl ConditionValue {
    /// String form used by every comparison.
    pub fn to_compare_string(&self) -> String {
        match self {
            ConditionValue::Number(number) => crate::value::format_number(*number),
            ConditionValue::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Number(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(value as f64)
    }
}

/// One atomic comparison between a field's runtime value and a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: String,
    /// Field the condition reads. May name a field that no longer exists.
    pub field_id: String,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionValue>,
}

impl Condition {
    pub fn new(
        id: impl Into<String>,
        field_id: impl Into<String>,
        operator: ConditionOperator,
        value: Option<ConditionValue>,
    ) -> Self {
        Self {
            id: id.into(),
            field_id: field_id.into(),
            operator,
            value,
        }
    }

    /// The comparison value in string form; empty when absent.
    pub fn compare_value(&self) -> String {
        self.value
            .as_ref()
            .map(ConditionValue::to_compare_string)
            .unwrap_or_default()
    }
}
