use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::spec::field::{Field, FieldType};
use crate::spec::rule::Rule;
use crate::value::{is_blank, lookup, stringify};
use crate::visibility::{VisibilityMap, is_visible, resolve_form_visibility};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// A single problem with a submitted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field_id: String,
    pub path: String,
    pub message: String,
    pub code: String,
}

/// Outcome of validating a snapshot against the currently visible fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub missing_required: Vec<String>,
    pub unknown_fields: Vec<String>,
}

/// Validates `snapshot` with hidden fields exempt from every check.
pub fn validate(fields: &[Field], rules: &[Rule], snapshot: &Value) -> ValidationResult {
    let visibility = resolve_form_visibility(fields, rules, snapshot);

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    for field in fields {
        if !is_visible(&visibility, &field.id) {
            continue;
        }

        let value = lookup(snapshot, &field.id);
        if is_blank(value) {
            if field.required {
                missing_required.push(field.id.clone());
            }
            continue;
        }

        if let Some(value) = value
            && let Some(error) = validate_value(field, value)
        {
            errors.push(error);
        }
    }

    let known: BTreeSet<&str> = fields.iter().map(|field| field.id.as_str()).collect();
    let unknown_fields: Vec<String> = snapshot
        .as_object()
        .map(|answers| {
            answers
                .keys()
                .filter(|key| !known.contains(key.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

/// The snapshot restricted to known, visible fields.
pub fn submission(fields: &[Field], visibility: &VisibilityMap, snapshot: &Value) -> Value {
    let mut submitted = Map::new();
    for field in fields {
        if !is_visible(visibility, &field.id) {
            continue;
        }
        if let Some(value) = lookup(snapshot, &field.id) {
            submitted.insert(field.id.clone(), value.clone());
        }
    }
    Value::Object(submitted)
}

fn validate_value(field: &Field, value: &Value) -> Option<ValidationError> {
    match field.kind {
        FieldType::Email => {
            let text = stringify(value);
            (!EMAIL_PATTERN.is_match(text.trim()))
                .then(|| base_error(field, "not a valid email address", "invalid_email"))
        }
        FieldType::Date => {
            let text = stringify(value);
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .is_err()
                .then(|| base_error(field, "not a valid date (YYYY-MM-DD)", "invalid_date"))
        }
        FieldType::MultipleChoice if !field.options.is_empty() => {
            let selected: Vec<String> = match value {
                Value::Array(items) => items.iter().map(stringify).collect(),
                other => vec![stringify(other)],
            };
            selected
                .iter()
                .any(|choice| !field.options.contains(choice))
                .then(|| base_error(field, "invalid choice", "choice_mismatch"))
        }
        _ => None,
    }
}

fn base_error(field: &Field, message: &str, code: &str) -> ValidationError {
    ValidationError {
        field_id: field.id.clone(),
        path: format!("/{}", field.id),
        message: message.into(),
        code: code.into(),
    }
}
