//! Adapter between the authoring document and the engine.
//!
//! The document is an editor node tree: every node is an object with a
//! `type`, optional `attrs`, and optional `content` children. This is the
//! only module that knows that shape; everything downstream works on flat
//! [`Field`] and [`Rule`] values.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{LogicError, Result};
use crate::spec::condition::{Condition, ConditionOperator, ConditionValue};
use crate::spec::config::EngineConfig;
use crate::spec::field::{Field, FieldType};
use crate::spec::rule::{LogicOperator, Rule, RuleAction};
use crate::value::stringify;

/// Rules read from a document plus the logic nodes that could not be used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleExtraction {
    pub rules: Vec<Rule>,
    pub skipped: Vec<SkippedRule>,
}

/// A logic node dropped during extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRule {
    pub id: Option<String>,
    pub reason: String,
}

/// Lists every field rules may reference, in document order.
///
/// A node qualifies when it is neither a logic node nor an option node and
/// carries both an `id` and a `label` attribute.
pub fn list_referenceable_fields(document: &Value, config: &EngineConfig) -> Result<Vec<Field>> {
    ensure_node(document)?;
    let mut fields = Vec::new();
    walk(document, &mut |node| {
        let node_type = node_type(node);
        if config.is_logic_node(node_type) || config.is_option_node(node_type) {
            return;
        }
        let Some(attrs) = attrs(node) else {
            return;
        };
        let (Some(id), Some(label)) = (string_attr(attrs, "id"), string_attr(attrs, "label"))
        else {
            return;
        };
        fields.push(Field {
            id,
            label,
            kind: FieldType::from_node_type(node_type),
            content: text_content(node),
            required: attrs
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            options: collect_options(node, config),
        });
    });
    debug!(fields = fields.len(), "referenceable fields listed");
    Ok(fields)
}

/// Builds typed rules from every logic node, in document order.
pub fn extract_rules(document: &Value, config: &EngineConfig) -> Result<RuleExtraction> {
    ensure_node(document)?;
    let mut extraction = RuleExtraction::default();
    walk(document, &mut |node| {
        if !config.is_logic_node(node_type(node)) {
            return;
        }
        match rule_from_node(node, config) {
            Ok(rule) => extraction.rules.push(rule),
            Err(skipped) => {
                warn!(rule = ?skipped.id, reason = %skipped.reason, "logic node skipped");
                extraction.skipped.push(skipped);
            }
        }
    });
    debug!(
        rules = extraction.rules.len(),
        skipped = extraction.skipped.len(),
        "rules extracted"
    );
    Ok(extraction)
}

pub(crate) fn ensure_node(document: &Value) -> Result<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(LogicError::InvalidDocument(
            "document root must be a node object".into(),
        ))
    }
}

/// Pre-order traversal, matching the visual order in the editor.
pub(crate) fn walk<'a>(node: &'a Value, visit: &mut dyn FnMut(&'a Value)) {
    visit(node);
    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            walk(child, visit);
        }
    }
}

pub(crate) fn walk_mut(node: &mut Value, visit: &mut dyn FnMut(&mut Value)) {
    visit(node);
    if let Some(children) = node.get_mut("content").and_then(Value::as_array_mut) {
        for child in children {
            walk_mut(child, visit);
        }
    }
}

pub(crate) fn node_type(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or_default()
}

fn attrs(node: &Value) -> Option<&Map<String, Value>> {
    node.get("attrs").and_then(Value::as_object)
}

fn string_attr(attrs: &Map<String, Value>, key: &str) -> Option<String> {
    match attrs.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn text_content(node: &Value) -> String {
    let mut text = String::new();
    walk(node, &mut |child| {
        if let Some(fragment) = child.get("text").and_then(Value::as_str) {
            text.push_str(fragment);
        }
    });
    text
}

fn collect_options(node: &Value, config: &EngineConfig) -> Vec<String> {
    let mut options = Vec::new();
    walk(node, &mut |child| {
        if !config.is_option_node(node_type(child)) {
            return;
        }
        let label = attrs(child)
            .and_then(|attrs| string_attr(attrs, "label"))
            .unwrap_or_else(|| text_content(child));
        options.push(label);
    });
    options
}

fn rule_from_node(node: &Value, config: &EngineConfig) -> std::result::Result<Rule, SkippedRule> {
    let empty = Map::new();
    let attrs = attrs(node).unwrap_or(&empty);
    let id = string_attr(attrs, "id").filter(|id| !id.is_empty());
    let skip = |reason: String| SkippedRule {
        id: id.clone(),
        reason,
    };

    let Some(rule_id) = id.clone() else {
        return Err(skip("logic node has no id".into()));
    };

    let action = match attrs.get("action").and_then(Value::as_str) {
        Some(raw) => RuleAction::parse(raw).ok_or_else(|| skip(format!("unknown action '{raw}'")))?,
        None => return Err(skip("logic node has no action".into())),
    };

    let logic_operator = match attrs.get("logicOperator").and_then(Value::as_str) {
        Some(raw) => LogicOperator::parse(raw).unwrap_or_else(|| {
            warn!(
                rule = %rule_id,
                logic_operator = raw,
                fallback = %config.fallback_logic_operator,
                "unrecognised logic operator"
            );
            config.fallback_logic_operator
        }),
        None => config.fallback_logic_operator,
    };

    let conditions = attrs
        .get("conditions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(position, item)| condition_from_value(&rule_id, position, item))
                .collect()
        })
        .unwrap_or_default();

    let target_field_ids = attrs
        .get("targetFieldIds")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(stringify)
                .collect()
        })
        .unwrap_or_default();

    Ok(Rule {
        id: rule_id,
        conditions,
        logic_operator,
        target_field_ids,
        action,
    })
}

fn condition_from_value(rule_id: &str, position: usize, item: &Value) -> Option<Condition> {
    let Some(attrs) = item.as_object() else {
        warn!(rule = %rule_id, position, "condition is not an object");
        return None;
    };
    let operator = attrs
        .get("operator")
        .and_then(Value::as_str)
        .map(ConditionOperator::from_name)
        .unwrap_or(ConditionOperator::Unknown);
    let value = match attrs.get("value") {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_f64().map(ConditionValue::Number),
        Some(Value::String(text)) => Some(ConditionValue::Text(text.clone())),
        Some(other) => Some(ConditionValue::Text(stringify(other))),
    };
    Some(Condition {
        id: string_attr(attrs, "id").unwrap_or_else(|| format!("{rule_id}-{position}")),
        field_id: string_attr(attrs, "fieldId").unwrap_or_default(),
        operator,
        value,
    })
}
