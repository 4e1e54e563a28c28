//! Per-field dependency tracking for incremental re-resolution.
//!
//! A respondent edit touches one field at a time. Only the rules whose
//! conditions read that field can change their outcome, and a target's
//! visibility is always decided by the last rule that targets it, so an
//! edit only needs to revisit targets controlled by an affected rule.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use crate::spec::rule::Rule;
use crate::visibility::VisibilityMap;

/// Maps fields to the rules that read them and targets to the rule that controls them.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    readers: BTreeMap<String, BTreeSet<usize>>,
    controllers: BTreeMap<String, usize>,
}

impl DependencyIndex {
    pub fn build(rules: &[Rule]) -> Self {
        let mut index = Self::default();
        for (position, rule) in rules.iter().enumerate() {
            for condition in &rule.conditions {
                index
                    .readers
                    .entry(condition.field_id.clone())
                    .or_default()
                    .insert(position);
            }
            for target in &rule.target_field_ids {
                index.controllers.insert(target.clone(), position);
            }
        }
        index
    }

    /// Indices of rules with at least one condition on `field_id`, in authoring order.
    pub fn rules_reading(&self, field_id: &str) -> impl Iterator<Item = usize> + '_ {
        self.readers
            .get(field_id)
            .into_iter()
            .flat_map(|positions| positions.iter().copied())
    }

    /// Index of the last rule targeting `field_id`, which decides its visibility.
    pub fn controlling_rule(&self, field_id: &str) -> Option<usize> {
        self.controllers.get(field_id).copied()
    }

    /// Targets whose visibility is decided by the rule at `position`.
    pub fn targets_controlled_by(&self, position: usize) -> impl Iterator<Item = &str> + '_ {
        self.controllers
            .iter()
            .filter(move |(_, controller)| **controller == position)
            .map(|(target, _)| target.as_str())
    }
}

/// Keeps a visibility map current across single-field edits.
///
/// Holds the rules and their last `conditionsMet` results, never the
/// snapshot: every update takes the caller's latest snapshot.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    rules: Vec<Rule>,
    index: DependencyIndex,
    met: Vec<bool>,
    visibility: VisibilityMap,
}

impl VisibilityTracker {
    pub fn new(rules: Vec<Rule>, snapshot: &Value) -> Self {
        let mut tracker = Self {
            rules: Vec::new(),
            index: DependencyIndex::default(),
            met: Vec::new(),
            visibility: VisibilityMap::new(),
        };
        tracker.rules_changed(rules, snapshot);
        tracker
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_visible(&self, field_id: &str) -> bool {
        crate::visibility::is_visible(&self.visibility, field_id)
    }

    /// Replaces the rule set and recomputes everything.
    pub fn rules_changed(&mut self, rules: Vec<Rule>, snapshot: &Value) {
        self.index = DependencyIndex::build(&rules);
        self.met = rules
            .iter()
            .map(|rule| rule.conditions_met(snapshot))
            .collect();
        self.rules = rules;
        self.visibility = self
            .index
            .controllers
            .iter()
            .map(|(target, position)| {
                let rule = &self.rules[*position];
                (target.clone(), rule.action.visibility(self.met[*position]))
            })
            .collect();
        debug!(rules = self.rules.len(), "visibility tracker rebuilt");
    }

    /// Re-evaluates the rules reading `field_id` and returns the targets whose
    /// visibility flipped.
    pub fn field_changed(&mut self, field_id: &str, snapshot: &Value) -> Vec<String> {
        let affected: Vec<usize> = self.index.rules_reading(field_id).collect();
        let mut changed = Vec::new();

        for position in affected {
            let rule = &self.rules[position];
            let met = rule.conditions_met(snapshot);
            if met == self.met[position] {
                continue;
            }
            self.met[position] = met;
            let visible = rule.action.visibility(met);
            for target in self.index.targets_controlled_by(position) {
                if self.visibility.insert(target.to_string(), visible) != Some(visible) {
                    changed.push(target.to_string());
                }
            }
        }

        debug!(field = %field_id, changed = changed.len(), "field change propagated");
        changed
    }
}
