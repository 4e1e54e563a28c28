use serde_json::Value;

use crate::spec::condition::Condition;
use crate::spec::rule::{LogicOperator, Rule};
use crate::value::lookup;

/// Combines the results of a rule's conditions into one boolean.
///
/// An empty list is vacuously met under both combinators. Conditions are
/// pure, so evaluation short-circuits.
pub fn conditions_met(conditions: &[Condition], snapshot: &Value, logic: LogicOperator) -> bool {
    if conditions.is_empty() {
        return true;
    }

    let mut results = conditions
        .iter()
        .map(|condition| condition.evaluate(lookup(snapshot, &condition.field_id)));

    match logic {
        LogicOperator::And => results.all(|met| met),
        LogicOperator::Or => results.any(|met| met),
    }
}

impl Rule {
    /// Whether this rule's conditions are met for `snapshot`.
    pub fn conditions_met(&self, snapshot: &Value) -> bool {
        conditions_met(&self.conditions, snapshot, self.logic_operator)
    }
}
