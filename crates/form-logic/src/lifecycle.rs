//! Authoring-time rule lifecycle.
//!
//! A rule is either committed (part of the document's ordered rule
//! collection) or a [`RuleDraft`] open in the editor. Committing a draft for
//! a new rule appends it; committing a draft opened on an existing rule
//! replaces that rule in place, keeping its id and position.

use tracing::debug;
use uuid::Uuid;

use crate::error::{LogicError, Result};
use crate::spec::condition::{Condition, ConditionOperator, ConditionValue};
use crate::spec::rule::{LogicOperator, Rule, RuleAction};

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Where a draft will land on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftOrigin {
    New,
    Editing,
}

/// A rule being edited, not yet part of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDraft {
    origin: DraftOrigin,
    rule: Rule,
}

impl RuleDraft {
    pub fn origin(&self) -> DraftOrigin {
        self.origin
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn id(&self) -> &str {
        &self.rule.id
    }

    /// Appends a condition with a fresh id and returns that id.
    pub fn add_condition(
        &mut self,
        field_id: impl Into<String>,
        operator: ConditionOperator,
        value: Option<ConditionValue>,
    ) -> String {
        let id = fresh_id();
        self.rule
            .conditions
            .push(Condition::new(id.clone(), field_id, operator, value));
        id
    }

    /// Replaces the condition with `condition_id`, keeping its id. Returns
    /// `false` when no such condition exists.
    pub fn update_condition(
        &mut self,
        condition_id: &str,
        field_id: impl Into<String>,
        operator: ConditionOperator,
        value: Option<ConditionValue>,
    ) -> bool {
        match self
            .rule
            .conditions
            .iter_mut()
            .find(|condition| condition.id == condition_id)
        {
            Some(condition) => {
                condition.field_id = field_id.into();
                condition.operator = operator;
                condition.value = value;
                true
            }
            None => false,
        }
    }

    pub fn remove_condition(&mut self, condition_id: &str) -> bool {
        let before = self.rule.conditions.len();
        self.rule
            .conditions
            .retain(|condition| condition.id != condition_id);
        self.rule.conditions.len() != before
    }

    pub fn set_logic_operator(&mut self, logic_operator: LogicOperator) {
        self.rule.logic_operator = logic_operator;
    }

    pub fn set_action(&mut self, action: RuleAction) {
        self.rule.action = action;
    }

    /// Sets the targets, dropping duplicates while keeping first occurrence order.
    pub fn set_targets<I, S>(&mut self, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for target in targets {
            let target = target.into();
            if !unique.contains(&target) {
                unique.push(target);
            }
        }
        self.rule.target_field_ids = unique;
    }
}

/// Committed rules in authoring order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBook {
    rules: Vec<Rule>,
}

impl RuleBook {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn get(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == rule_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Opens a draft for a brand-new rule. New rules default to `show` with `AND`.
    pub fn begin_new(&self) -> RuleDraft {
        RuleDraft {
            origin: DraftOrigin::New,
            rule: Rule::new(fresh_id(), RuleAction::Show),
        }
    }

    /// Opens a draft scoped to the committed rule `rule_id`.
    pub fn begin_edit(&self, rule_id: &str) -> Result<RuleDraft> {
        let rule = self
            .get(rule_id)
            .ok_or_else(|| LogicError::RuleNotFound(rule_id.to_string()))?;
        Ok(RuleDraft {
            origin: DraftOrigin::Editing,
            rule: rule.clone(),
        })
    }

    /// Commits a draft, returning the committed rule.
    pub fn commit(&mut self, draft: RuleDraft) -> Result<&Rule> {
        let position = self.rules.iter().position(|rule| rule.id == draft.rule.id);
        let index = match (draft.origin, position) {
            (DraftOrigin::New, None) => {
                self.rules.push(draft.rule);
                self.rules.len() - 1
            }
            (DraftOrigin::New, Some(_)) => {
                return Err(LogicError::DuplicateRule(draft.rule.id));
            }
            (DraftOrigin::Editing, Some(index)) => {
                self.rules[index] = draft.rule;
                index
            }
            (DraftOrigin::Editing, None) => {
                return Err(LogicError::RuleNotFound(draft.rule.id));
            }
        };
        debug!(rule = %self.rules[index].id, position = index, "rule committed");
        Ok(&self.rules[index])
    }

    /// Drops a draft without touching the committed rules.
    pub fn discard(&self, draft: RuleDraft) {
        debug!(rule = %draft.rule.id, "rule draft discarded");
    }

    pub fn remove(&mut self, rule_id: &str) -> Result<Rule> {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.id == rule_id)
            .ok_or_else(|| LogicError::RuleNotFound(rule_id.to_string()))?;
        Ok(self.rules.remove(index))
    }
}

impl From<Vec<Rule>> for RuleBook {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}
