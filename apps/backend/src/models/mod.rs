//! API request and response types

use serde::{Deserialize, Serialize};

// Re-export shared types from question-core
pub use question_core::{
    Evaluation, GapText, Question, QuestionModule, Response, ValidationErrors,
};

/// Module entry in the module list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub question_count: usize,
}

impl From<&QuestionModule> for ModuleSummary {
    fn from(module: &QuestionModule) -> Self {
        Self {
            id: module.id.clone(),
            name: module.name.clone(),
            description: module.description.clone(),
            question_count: module.questions.len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModuleListResponse {
    pub modules: Vec<ModuleSummary>,
}

/// Editable gap text, e.g. `The [cat; kitten] sat.`
#[derive(Debug, Serialize, Deserialize)]
pub struct RawGapTextRequest {
    pub raw: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawGapTextResponse {
    pub raw: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub text: String,
}

/// Validation request for a question the editor is about to submit
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateQuestionRequest {
    pub question: Question,
    #[serde(default)]
    pub existing_ids: Vec<String>,
    #[serde(default)]
    pub original_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateQuestionResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}
