//! Field id regeneration.
//!
//! Publishing a form gives every field a fresh id. Rules reference fields by
//! id in two places, condition `fieldId`s and `targetFieldIds`, and both are
//! rewritten together with the field nodes so no rule is left pointing at a
//! stale id.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::registry::{ensure_node, node_type, walk_mut};
use crate::spec::config::EngineConfig;
use crate::spec::field::Field;
use crate::spec::rule::Rule;

/// Old field id to new field id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRemap {
    ids: BTreeMap<String, String>,
}

impl IdRemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh UUID to every field.
    pub fn regenerate(fields: &[Field]) -> Self {
        let ids = fields
            .iter()
            .map(|field| (field.id.clone(), Uuid::new_v4().to_string()))
            .collect();
        Self { ids }
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.ids.insert(old.into(), new.into());
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.ids.get(old).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unmapped ids are returned unchanged.
    pub fn translate(&self, id: &str) -> String {
        self.get(id).unwrap_or(id).to_string()
    }

    /// Rewrites field node ids and every rule reference inside the document.
    /// Returns the number of ids rewritten.
    pub fn apply_to_document(&self, document: &mut Value, config: &EngineConfig) -> Result<usize> {
        ensure_node(document)?;
        let mut rewritten = 0;
        walk_mut(document, &mut |node| {
            let is_logic = config.is_logic_node(node_type(node));
            let Some(attrs) = node.get_mut("attrs").and_then(Value::as_object_mut) else {
                return;
            };
            if is_logic {
                if let Some(conditions) = attrs.get_mut("conditions").and_then(Value::as_array_mut) {
                    for condition in conditions {
                        if let Some(field_id) = condition.get_mut("fieldId") {
                            rewritten += self.rewrite(field_id);
                        }
                    }
                }
                if let Some(targets) = attrs
                    .get_mut("targetFieldIds")
                    .and_then(Value::as_array_mut)
                {
                    for target in targets {
                        rewritten += self.rewrite(target);
                    }
                }
            } else if let Some(id) = attrs.get_mut("id") {
                rewritten += self.rewrite(id);
            }
        });
        debug!(mapped = self.ids.len(), rewritten, "document ids remapped");
        Ok(rewritten)
    }

    /// Rewrites condition and target references of typed rules.
    pub fn apply_to_rules(&self, rules: &mut [Rule]) {
        for rule in rules {
            for condition in &mut rule.conditions {
                condition.field_id = self.translate(&condition.field_id);
            }
            for target in &mut rule.target_field_ids {
                *target = self.translate(target);
            }
        }
    }

    pub fn apply_to_fields(&self, fields: &mut [Field]) {
        for field in fields {
            field.id = self.translate(&field.id);
        }
    }

    /// Numeric ids are matched by their string form and written back as strings.
    fn rewrite(&self, slot: &mut Value) -> usize {
        let new = match &*slot {
            Value::String(old) => self.get(old),
            Value::Number(old) => self.get(&old.to_string()),
            _ => None,
        };
        let Some(new) = new else {
            return 0;
        };
        *slot = Value::String(new.to_string());
        1
    }
}

impl FromIterator<(String, String)> for IdRemap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
