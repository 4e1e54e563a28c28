use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::condition::Condition;

/// Combinator applied across a rule's conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

impl LogicOperator {
    /// Case-insensitive parse of `AND` / `OR`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if raw.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// What "conditions met" means for a rule's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Show,
    Hide,
}

impl RuleAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "show" => Some(Self::Show),
            "hide" => Some(Self::Hide),
            _ => None,
        }
    }

    /// Visibility a target receives given the rule's `conditionsMet` result.
    pub fn visibility(&self, conditions_met: bool) -> bool {
        match self {
            Self::Show => conditions_met,
            Self::Hide => !conditions_met,
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => f.write_str("show"),
            Self::Hide => f.write_str("hide"),
        }
    }
}

/// Author-defined show/hide directive.
///
/// An empty `conditions` list is vacuously met, so the rule always fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic_operator: LogicOperator,
    #[serde(default)]
    pub target_field_ids: Vec<String>,
    pub action: RuleAction,
}

impl Rule {
    pub fn new(id: impl Into<String>, action: RuleAction) -> Self {
        Self {
            id: id.into(),
            conditions: Vec::new(),
            logic_operator: LogicOperator::And,
            target_field_ids: Vec::new(),
            action,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_logic(mut self, logic_operator: LogicOperator) -> Self {
        self.logic_operator = logic_operator;
        self
    }

    pub fn with_target(mut self, field_id: impl Into<String>) -> Self {
        self.target_field_ids.push(field_id.into());
        self
    }

    /// Whether any condition of this rule reads `field_id`.
    pub fn references(&self, field_id: &str) -> bool {
        self.conditions
            .iter()
            .any(|condition| condition.field_id == field_id)
    }
}
