use serde_json::{Map, Value, json};

use crate::spec::field::{Field, FieldType};
use crate::spec::rule::Rule;
use crate::visibility::{VisibilityMap, is_visible};

/// JSON Schema for the answers a respondent may submit under `visibility`.
///
/// Hidden fields are left out entirely, so a hidden required field never
/// shows up in `required`.
pub fn generate(fields: &[Field], visibility: &VisibilityMap) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        if !is_visible(visibility, &field.id) {
            continue;
        }
        properties.insert(field.id.clone(), field_schema(field));
        if field.required {
            required.push(Value::String(field.id.clone()));
        }
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// JSON Schema of an ordered rule collection.
pub fn rules_schema() -> Value {
    let schema = schemars::schema_for!(Vec<Rule>);
    schema.to_value()
}

fn field_schema(field: &Field) -> Value {
    let mut schema = match field.kind {
        FieldType::Email => json!({ "type": "string", "format": "email" }),
        FieldType::Date => json!({ "type": "string", "format": "date" }),
        FieldType::MultipleChoice if !field.options.is_empty() => json!({
            "oneOf": [
                { "type": "string", "enum": field.options },
                { "type": "array", "items": { "type": "string", "enum": field.options } },
            ]
        }),
        FieldType::FileUpload => json!({
            "oneOf": [
                { "type": "string" },
                { "type": "array", "items": { "type": "string" } },
            ]
        }),
        _ => json!({ "type": ["string", "number"] }),
    };
    if let Some(object) = schema.as_object_mut() {
        object.insert("title".into(), Value::String(field.label.clone()));
    }
    schema
}
