//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use question_core::{
    AnswerOptions, ChoiceOption, ExtendedMatch, GapText, MatchElement, MatchPair, ModuleStore,
    Question, QuestionError, QuestionModule, Result,
};

pub const MODULE_ID: &str = "geography";

/// Multiple-choice question with `option-1` correct.
pub fn multiple_choice(id: &str) -> Question {
    Question::new(
        id,
        AnswerOptions::MultipleChoice(vec![
            ChoiceOption::new("option-0", "Lyon", false),
            ChoiceOption::new("option-1", "Paris", true),
        ]),
    )
}

/// Gap text question with one gap accepting "multiple" or "more than one".
pub fn gap_text(id: &str) -> Question {
    Question::new(
        id,
        AnswerOptions::GapText(GapText::new(
            "A [] choice question",
            vec![vec!["multiple".to_string(), "more than one".to_string()]],
        )),
    )
}

/// Extended-match question where two left elements match `r0`.
pub fn extended_match(id: &str) -> Question {
    let element = |id: &str, text: &str| MatchElement {
        id: id.to_string(),
        text: text.to_string(),
    };
    Question::new(
        id,
        AnswerOptions::ExtendedMatch(ExtendedMatch {
            left_side: vec![element("l0", "Paris"), element("l1", "Lyon")],
            right_side: vec![element("r0", "France"), element("r1", "Spain")],
            correct_matches: vec![MatchPair::new("l0", "r0"), MatchPair::new("l1", "r0")],
        }),
    )
}

/// Module holding one question of each fixture type.
pub fn sample_module() -> QuestionModule {
    let mut module = QuestionModule::new(MODULE_ID, "Geography");
    module.questions = vec![
        multiple_choice("capital"),
        gap_text("plural"),
        extended_match("cities"),
    ];
    module
}

/// Path of a question under the sample module.
pub fn question_path(question_id: &str) -> String {
    format!("/api/modules/{}/questions/{}", MODULE_ID, question_id)
}

/// Create a response request body.
pub fn response_body(kind: &str, value: serde_json::Value) -> serde_json::Value {
    json!({ "type": kind, "value": value })
}

/// Store whose backend is always unreachable.
pub struct UnreachableStore;

impl UnreachableStore {
    fn error() -> QuestionError {
        QuestionError::Storage("connection refused".to_string())
    }
}

impl ModuleStore for UnreachableStore {
    fn list_modules(&self) -> Result<Vec<QuestionModule>> {
        Err(Self::error())
    }

    fn load_module(&self, _module_id: &str) -> Result<Option<QuestionModule>> {
        Err(Self::error())
    }

    fn save_module(&mut self, _module: QuestionModule) -> Result<()> {
        Err(Self::error())
    }

    fn delete_module(&mut self, _module_id: &str) -> Result<bool> {
        Err(Self::error())
    }
}
