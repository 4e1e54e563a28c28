use serde_json::{Value, json};

use form_logic::{
    ConditionOperator, ConditionValue, EngineConfig, FieldType, FormLogic, IdRemap, LogicError,
    LogicOperator, RuleAction, extract_rules, list_referenceable_fields,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "intake_form" => include_str!("../tests/fixtures/intake_form.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn intake_document() -> Value {
    serde_json::from_str(fixture("intake_form")).expect("deserialize")
}

#[test]
fn lists_fields_in_document_order() {
    let fields = list_referenceable_fields(&intake_document(), &EngineConfig::default())
        .expect("fields");
    let ids: Vec<&str> = fields.iter().map(|field| field.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["name", "attending", "email", "arrival", "reason", "ticket"]
    );

    let name = &fields[0];
    assert_eq!(name.label, "Full name");
    assert_eq!(name.kind, FieldType::ShortText);
    assert_eq!(name.content, "Your name");
    assert!(name.required);

    let attending = &fields[1];
    assert_eq!(attending.kind, FieldType::MultipleChoice);
    assert_eq!(attending.options, vec!["yes", "no"]);

    assert_eq!(fields[2].kind, FieldType::Email);
    assert_eq!(fields[3].kind, FieldType::Date);
    assert!(!fields[3].required);
    assert_eq!(fields[5].kind, FieldType::FileUpload);
}

#[test]
fn option_and_logic_nodes_are_not_fields() {
    let fields = list_referenceable_fields(&intake_document(), &EngineConfig::default())
        .expect("fields");
    assert!(fields.iter().all(|field| !field.id.starts_with("attending-")));
    assert!(fields.iter().all(|field| field.id != "show-details"));
}

#[test]
fn nodes_without_label_are_skipped() {
    let document = json!({
        "type": "doc",
        "content": [
            { "type": "shortText", "attrs": { "id": "no-label" } },
            { "type": "shortText", "attrs": { "label": "No id" } },
            { "type": "paragraph", "attrs": { "id": "p", "label": "Paragraph" } }
        ]
    });
    let fields = list_referenceable_fields(&document, &EngineConfig::default()).expect("fields");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, "p");
    assert_eq!(fields[0].kind, FieldType::Unknown);
}

#[test]
fn extracts_typed_rules_and_reports_skipped_nodes() {
    let extraction = extract_rules(&intake_document(), &EngineConfig::default()).expect("rules");
    let ids: Vec<&str> = extraction.rules.iter().map(|rule| rule.id.as_str()).collect();
    assert_eq!(ids, vec!["show-details", "hide-reason"]);

    let show = &extraction.rules[0];
    assert_eq!(show.action, RuleAction::Show);
    assert_eq!(show.logic_operator, LogicOperator::And);
    assert_eq!(show.target_field_ids, vec!["email", "arrival"]);
    assert_eq!(show.conditions[0].field_id, "attending");
    assert_eq!(show.conditions[0].operator, ConditionOperator::Equals);
    assert_eq!(
        show.conditions[0].value,
        Some(ConditionValue::Text("yes".into()))
    );

    assert_eq!(extraction.rules[1].logic_operator, LogicOperator::Or);

    assert_eq!(extraction.skipped.len(), 2);
    assert_eq!(extraction.skipped[0].id, None);
    assert_eq!(extraction.skipped[1].id.as_deref(), Some("broken-action"));
    assert!(extraction.skipped[1].reason.contains("toggle"));
}

#[test]
fn loose_attribute_values_are_coerced() {
    let document = json!({
        "type": "doc",
        "content": [{
            "type": "conditionalLogic",
            "attrs": {
                "id": "r",
                "conditions": [
                    { "fieldId": "age", "operator": "greater_than", "value": 18 },
                    { "id": "flag", "fieldId": "agree", "operator": "equals", "value": true },
                    { "id": "empty", "fieldId": "notes", "operator": "is_empty", "value": null },
                    { "id": "odd", "fieldId": "x", "operator": "between" },
                    "not a condition"
                ],
                "logicOperator": "XOR",
                "targetFieldIds": ["a", 7, null],
                "action": "hide"
            }
        }]
    });
    let config = EngineConfig {
        fallback_logic_operator: LogicOperator::Or,
        ..EngineConfig::default()
    };
    let extraction = extract_rules(&document, &config).expect("rules");
    let rule = &extraction.rules[0];

    assert_eq!(rule.logic_operator, LogicOperator::Or);
    assert_eq!(rule.target_field_ids, vec!["a", "7"]);
    assert_eq!(rule.conditions.len(), 4);
    assert_eq!(rule.conditions[0].id, "r-0");
    assert_eq!(rule.conditions[0].value, Some(ConditionValue::Number(18.0)));
    assert_eq!(
        rule.conditions[1].value,
        Some(ConditionValue::Text("true".into()))
    );
    assert_eq!(rule.conditions[2].value, None);
    assert_eq!(rule.conditions[3].operator, ConditionOperator::Unknown);
}

#[test]
fn missing_logic_operator_uses_configured_fallback() {
    let document = json!({
        "type": "doc",
        "content": [{
            "type": "conditionalLogic",
            "attrs": { "id": "r", "action": "show", "targetFieldIds": ["a"] }
        }]
    });
    let extraction = extract_rules(&document, &EngineConfig::default()).expect("rules");
    assert_eq!(extraction.rules[0].logic_operator, LogicOperator::And);
    assert!(extraction.rules[0].conditions.is_empty());
}

#[test]
fn custom_node_types_from_config() {
    let config: EngineConfig = serde_json::from_value(json!({
        "logicNodeTypes": ["visibilityRule"],
        "optionNodeTypes": ["choice"]
    }))
    .expect("config");
    assert_eq!(config.fallback_logic_operator, LogicOperator::And);

    let document = json!({
        "type": "doc",
        "content": [
            {
                "type": "multipleChoice",
                "attrs": { "id": "color", "label": "Color" },
                "content": [{ "type": "choice", "content": [{ "type": "text", "text": "Red" }] }]
            },
            {
                "type": "visibilityRule",
                "attrs": { "id": "r", "action": "show", "targetFieldIds": ["color"] }
            }
        ]
    });
    let logic = FormLogic::from_document(&document, &config).expect("logic");
    assert_eq!(logic.fields.len(), 1);
    assert_eq!(logic.fields[0].options, vec!["Red"]);
    assert_eq!(logic.rules.len(), 1);
}

#[test]
fn rejects_non_node_documents() {
    let error = list_referenceable_fields(&json!([1, 2]), &EngineConfig::default())
        .expect_err("array root");
    assert!(matches!(error, LogicError::InvalidDocument(_)));
    assert!(extract_rules(&json!("doc"), &EngineConfig::default()).is_err());
}

#[test]
fn remap_rewrites_fields_and_every_rule_reference() {
    let config = EngineConfig::default();
    let mut document = intake_document();
    let fields = list_referenceable_fields(&document, &config).expect("fields");
    let remap = IdRemap::regenerate(&fields);
    assert_eq!(remap.len(), fields.len());

    let rewritten = remap.apply_to_document(&mut document, &config).expect("remap");
    // 6 field ids, 2 condition references, 5 target references.
    assert_eq!(rewritten, 13);

    let new_attending = remap.get("attending").expect("mapped").to_string();
    let new_email = remap.get("email").expect("mapped").to_string();
    let logic = FormLogic::from_document(&document, &config).expect("logic");
    assert!(logic.field(&new_attending).is_some());
    assert!(logic.field("attending").is_none());
    assert_eq!(logic.rules[0].conditions[0].field_id, new_attending);
    assert_eq!(logic.rules[0].target_field_ids[0], new_email);

    let mut snapshot = json!({});
    snapshot[new_attending.as_str()] = json!("yes");
    let visibility = logic.visibility(&snapshot);
    assert_eq!(visibility.get(&new_email), Some(&true));
}

#[test]
fn remap_leaves_dangling_references_alone() {
    let mut remap = IdRemap::new();
    remap.insert("a", "a2");
    let mut rules = vec![
        form_logic::Rule::new("r", RuleAction::Show)
            .with_condition(form_logic::Condition::new(
                "c",
                "a",
                ConditionOperator::IsNotEmpty,
                None,
            ))
            .with_condition(form_logic::Condition::new(
                "d",
                "gone",
                ConditionOperator::IsEmpty,
                None,
            ))
            .with_target("a")
            .with_target("gone"),
    ];
    remap.apply_to_rules(&mut rules);
    assert_eq!(rules[0].conditions[0].field_id, "a2");
    assert_eq!(rules[0].conditions[1].field_id, "gone");
    assert_eq!(rules[0].target_field_ids, vec!["a2", "gone"]);
}

#[test]
fn form_logic_round_trips_through_json() {
    let logic = FormLogic::from_document(&intake_document(), &EngineConfig::default())
        .expect("logic");
    let encoded = serde_json::to_value(&logic).expect("encode");
    assert_eq!(encoded["rules"][0]["logicOperator"], "AND");
    assert_eq!(encoded["rules"][0]["targetFieldIds"][1], "arrival");
    assert_eq!(encoded["fields"][1]["type"], "multipleChoice");
    let decoded: FormLogic = serde_json::from_value(encoded).expect("decode");
    assert_eq!(decoded, logic);
}

#[test]
fn remap_rewrites_numeric_ids_everywhere() {
    let config = EngineConfig::default();
    let mut document = json!({
        "type": "doc",
        "content": [
            { "type": "shortText", "attrs": { "id": 7, "label": "Age" } },
            { "type": "shortText", "attrs": { "id": "notes", "label": "Notes" } },
            {
                "type": "conditionalLogic",
                "attrs": {
                    "id": "r",
                    "conditions": [
                        { "id": "c1", "fieldId": "7", "operator": "greater_than", "value": 17 },
                        { "id": "c2", "fieldId": 7, "operator": "is_not_empty" }
                    ],
                    "targetFieldIds": [7, "notes"],
                    "action": "show"
                }
            }
        ]
    });
    let fields = list_referenceable_fields(&document, &config).expect("fields");
    assert_eq!(fields[0].id, "7");

    let remap = IdRemap::regenerate(&fields);
    let rewritten = remap.apply_to_document(&mut document, &config).expect("remap");
    assert_eq!(rewritten, 6);

    let new_age = remap.get("7").expect("mapped").to_string();
    let logic = FormLogic::from_document(&document, &config).expect("logic");
    assert_eq!(logic.fields[0].id, new_age);
    assert_eq!(document["content"][0]["attrs"]["id"], json!(new_age));
    let rule = &logic.rules[0];
    assert_eq!(rule.conditions[0].field_id, new_age);
    assert_eq!(rule.conditions[1].field_id, new_age);
    assert_eq!(rule.target_field_ids[0], new_age);

    let mut snapshot = json!({});
    snapshot[new_age.as_str()] = json!(30);
    assert_eq!(logic.visibility(&snapshot).get("7"), None);
    assert!(logic.rules[0].conditions_met(&snapshot));
}
