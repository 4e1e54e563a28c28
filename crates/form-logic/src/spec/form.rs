use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::registry::{extract_rules, list_referenceable_fields};
use crate::spec::config::EngineConfig;
use crate::spec::field::Field;
use crate::spec::rule::Rule;
use crate::validate::{ValidationResult, submission, validate};
use crate::visibility::{VisibilityMap, resolve_form_visibility};

/// Everything the engine needs from one form: its fields and its rules in
/// authoring order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormLogic {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl FormLogic {
    pub fn new(fields: Vec<Field>, rules: Vec<Rule>) -> Self {
        Self { fields, rules }
    }

    /// Reads fields and rules from an authoring document. Malformed logic
    /// nodes are dropped; use [`extract_rules`] to see why.
    pub fn from_document(document: &Value, config: &EngineConfig) -> Result<Self> {
        let fields = list_referenceable_fields(document, config)?;
        let rules = extract_rules(document, config)?.rules;
        Ok(Self { fields, rules })
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == field_id)
    }

    pub fn visibility(&self, snapshot: &Value) -> VisibilityMap {
        resolve_form_visibility(&self.fields, &self.rules, snapshot)
    }

    pub fn validate(&self, snapshot: &Value) -> ValidationResult {
        validate(&self.fields, &self.rules, snapshot)
    }

    /// Values to submit: only known fields that are currently visible.
    pub fn submission(&self, snapshot: &Value) -> Value {
        submission(&self.fields, &self.visibility(snapshot), snapshot)
    }
}
