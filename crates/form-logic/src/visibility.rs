use serde_json::Value;
use tracing::{debug, trace};

use crate::spec::field::Field;
use crate::spec::rule::Rule;

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

/// Resolves the visibility of every field targeted by `rules`.
///
/// Rules apply in the given order and a later rule fully overwrites the
/// decision of an earlier one for the same target. Fields no rule targets
/// are absent from the map and read as visible through [`is_visible`].
pub fn resolve_visibility(rules: &[Rule], snapshot: &Value) -> VisibilityMap {
    let mut map = VisibilityMap::new();
    apply_rules(&mut map, rules, snapshot);
    map
}

/// Like [`resolve_visibility`], but seeds every known field as visible first.
pub fn resolve_form_visibility(fields: &[Field], rules: &[Rule], snapshot: &Value) -> VisibilityMap {
    let mut map: VisibilityMap = fields
        .iter()
        .map(|field| (field.id.clone(), true))
        .collect();
    apply_rules(&mut map, rules, snapshot);
    map
}

/// Reads a visibility map with the default-visible convention.
pub fn is_visible(map: &VisibilityMap, field_id: &str) -> bool {
    map.get(field_id).copied().unwrap_or(true)
}

fn apply_rules(map: &mut VisibilityMap, rules: &[Rule], snapshot: &Value) {
    for rule in rules {
        let met = rule.conditions_met(snapshot);
        let visible = rule.action.visibility(met);
        for target in &rule.target_field_ids {
            trace!(rule = %rule.id, target = %target, action = %rule.action, met, visible, "rule applied");
            map.insert(target.clone(), visible);
        }
    }
    debug!(
        rules = rules.len(),
        hidden = map.values().filter(|visible| !**visible).count(),
        "visibility resolved"
    );
}
