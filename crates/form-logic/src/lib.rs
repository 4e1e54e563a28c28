#![allow(missing_docs)]

//! Conditional visibility rules for block-based forms.
//!
//! A form author attaches rules such as "if `q1` equals `yes`, show `q2`"
//! to a document. At fill time every respondent edit produces a fresh
//! snapshot of field values, and [`resolve_visibility`] turns rules plus
//! snapshot into a `field id -> visible` map consumed by rendering and
//! validation.

pub mod answers_schema;
pub mod condition;
pub mod dependency;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod remap;
pub mod ruleset;
pub mod spec;
pub mod validate;
pub mod value;
pub mod visibility;

pub use answers_schema::{generate as answers_schema, rules_schema};
pub use condition::evaluate;
pub use dependency::{DependencyIndex, VisibilityTracker};
pub use error::{LogicError, Result};
pub use lifecycle::{DraftOrigin, RuleBook, RuleDraft};
pub use registry::{RuleExtraction, SkippedRule, extract_rules, list_referenceable_fields};
pub use remap::IdRemap;
pub use ruleset::conditions_met;
pub use spec::{
    Condition, ConditionOperator, ConditionValue, EngineConfig, Field, FieldType, FormLogic,
    LogicOperator, Rule, RuleAction,
};
pub use validate::{ValidationError, ValidationResult, submission, validate};
pub use visibility::{VisibilityMap, is_visible, resolve_form_visibility, resolve_visibility};
