use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::rule::LogicOperator;

/// Knobs for reading authoring documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Node types holding conditional-logic rules.
    #[serde(default = "default_logic_node_types")]
    pub logic_node_types: Vec<String>,
    /// Node types holding multiple-choice options.
    #[serde(default = "default_option_node_types")]
    pub option_node_types: Vec<String>,
    /// Combinator used when a rule node carries no valid `logicOperator`.
    #[serde(default)]
    pub fallback_logic_operator: LogicOperator,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logic_node_types: default_logic_node_types(),
            option_node_types: default_option_node_types(),
            fallback_logic_operator: LogicOperator::And,
        }
    }
}

impl EngineConfig {
    pub fn is_logic_node(&self, node_type: &str) -> bool {
        self.logic_node_types.iter().any(|kind| kind == node_type)
    }

    pub fn is_option_node(&self, node_type: &str) -> bool {
        self.option_node_types.iter().any(|kind| kind == node_type)
    }
}

fn default_logic_node_types() -> Vec<String> {
    vec!["conditionalLogic".into()]
}

fn default_option_node_types() -> Vec<String> {
    vec!["multipleChoiceOption".into(), "option".into()]
}
