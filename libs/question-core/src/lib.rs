//! Question model and grading core shared by the editor and practice views.
//!
//! Provides:
//! - Tagged question model for the five question types
//! - Gap text codec between `[a; b]` editing form and `[]` templates
//! - Extended-match line graph with two-click line drawing
//! - Answer evaluation with per-part correction detail
//! - Validation before persistence, reported as a field -> message map

pub mod draft;
pub mod error;
pub mod evaluation;
pub mod extended_match;
pub mod gap_text;
pub mod store;
pub mod types;
pub mod validation;

pub use draft::{DraftAnswer, QuestionDraft};
pub use error::{QuestionError, Result};
pub use evaluation::{evaluate, Evaluation, EvaluationDetail, Response};
pub use extended_match::{Endpoint, ExtendedMatchGraph, MatchLine, Side, ToggleOutcome};
pub use gap_text::{decode, encode, remove_gap_content, Capabilities};
pub use store::{InMemoryModuleStore, ModuleStore};
pub use types::{
    AnswerOptions, ChoiceOption, ExtendedMatch, GapText, MatchElement, MatchPair, Question,
    QuestionModule, QuestionType,
};
pub use validation::{validate_module, validate_question, ValidationErrors};
