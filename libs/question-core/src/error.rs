//! Error types for question-core.

use thiserror::Error;

use crate::extended_match::Side;

/// Result type alias using QuestionError.
pub type Result<T> = std::result::Result<T, QuestionError>;

/// Errors raised by the codec, the match graph and evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("gap {index} has no accepted value: [{content}]")]
    InvalidGapSpan { index: usize, content: String },

    #[error("template has {markers} gap markers but {values} accepted value lists")]
    GapCountMismatch { markers: usize, values: usize },

    #[error("duplicate ID {id}")]
    DuplicateId { id: String },

    #[error("match references missing {side} element {id}")]
    DanglingMatchReference { side: Side, id: String },

    #[error("incomplete answer: {reason}")]
    IncompleteAnswerPayload { reason: String },

    #[error("invalid ID {value:?}: {reason}")]
    InvalidId { value: String, reason: &'static str },

    #[error("{feature} is not available")]
    FeatureUnavailable { feature: &'static str },

    /// Failure of a `ModuleStore` backend; the in-memory store never fails.
    #[error("storage error: {0}")]
    Storage(String),
}
