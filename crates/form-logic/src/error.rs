use thiserror::Error;

/// Failures outside the evaluation path.
///
/// Evaluating conditions and resolving visibility never fails; these cover
/// reading documents and editing the committed rule collection.
#[derive(Debug, Error)]
pub enum LogicError {
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("rule '{0}' is not committed")]
    RuleNotFound(String),
    #[error("rule '{0}' is already committed")]
    DuplicateRule(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LogicError>;
