use std::cmp::Ordering;

use serde_json::Value;
use tracing::trace;

use crate::spec::condition::{Condition, ConditionOperator};
use crate::value::{parse_number, stringify};

/// Evaluates one condition against the runtime value of its field.
///
/// `None` stands for a field that is absent or `null`; only `is_empty`
/// holds for it. Never fails: an unknown operator is simply `false`.
pub fn evaluate(condition: &Condition, field_value: Option<&Value>) -> bool {
    let result = match field_value {
        None => condition.operator == ConditionOperator::IsEmpty,
        Some(value) => compare(
            condition.operator,
            &stringify(value),
            &condition.compare_value(),
        ),
    };
    trace!(
        condition = %condition.id,
        field = %condition.field_id,
        operator = %condition.operator,
        result,
        "condition evaluated"
    );
    result
}

fn compare(operator: ConditionOperator, string_value: &str, compare_value: &str) -> bool {
    match operator {
        ConditionOperator::Equals => string_value == compare_value,
        ConditionOperator::NotEquals => string_value != compare_value,
        ConditionOperator::Contains => string_value
            .to_lowercase()
            .contains(&compare_value.to_lowercase()),
        ConditionOperator::GreaterThan => {
            ordering(string_value, compare_value) == Some(Ordering::Greater)
        }
        ConditionOperator::LessThan => ordering(string_value, compare_value) == Some(Ordering::Less),
        ConditionOperator::IsEmpty => string_value.trim().is_empty(),
        ConditionOperator::IsNotEmpty => !string_value.trim().is_empty(),
        ConditionOperator::Unknown => false,
    }
}

/// Numeric ordering when both sides parse, lexicographic otherwise.
fn ordering(left: &str, right: &str) -> Option<Ordering> {
    match (parse_number(left), parse_number(right)) {
        (Some(left), Some(right)) => left.partial_cmp(&right),
        _ => Some(left.cmp(right)),
    }
}

impl Condition {
    /// Shorthand for [`evaluate`].
    pub fn evaluate(&self, field_value: Option<&Value>) -> bool {
        evaluate(self, field_value)
    }
}
