pub mod condition;
pub mod config;
pub mod field;
pub mod form;
pub mod rule;

pub use condition::{Condition, ConditionOperator, ConditionValue};
pub use config::EngineConfig;
pub use field::{Field, FieldType};
pub use form::FormLogic;
pub use rule::{LogicOperator, Rule, RuleAction};
