//! In-memory question draft owned by one editor session.
//!
//! A draft is created empty or hydrated from a persisted question, mutated
//! one event at a time, and turned back into a [`Question`] on submit. Gap
//! text lives in its editable `[a; b]` form for as long as the draft exists.

use crate::error::{QuestionError, Result};
use crate::extended_match::{next_unused_id, ExtendedMatchGraph};
use crate::gap_text::{self, Capabilities};
use crate::types::{AnswerOptions, ChoiceOption, GapText, Question, QuestionType};
use crate::validation::{
    validate_answer_options, validate_metadata, ValidationErrors, FIELD_ANSWER_OPTIONS, FIELD_TYPE,
};

/// Editor-side answer payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftAnswer {
    MultipleChoice(Vec<ChoiceOption>),
    MultipleResponse(Vec<ChoiceOption>),
    /// Editable gap text.
    GapText(String),
    GapTextDropdown(String),
    ExtendedMatch(ExtendedMatchGraph),
}

impl DraftAnswer {
    pub fn empty(kind: QuestionType) -> Self {
        match kind {
            QuestionType::MultipleChoice => Self::MultipleChoice(Vec::new()),
            QuestionType::MultipleResponse => Self::MultipleResponse(Vec::new()),
            QuestionType::GapText => Self::GapText(String::new()),
            QuestionType::GapTextDropdown => Self::GapTextDropdown(String::new()),
            QuestionType::ExtendedMatch => Self::ExtendedMatch(ExtendedMatchGraph::new()),
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::MultipleChoice(_) => QuestionType::MultipleChoice,
            Self::MultipleResponse(_) => QuestionType::MultipleResponse,
            Self::GapText(_) => QuestionType::GapText,
            Self::GapTextDropdown(_) => QuestionType::GapTextDropdown,
            Self::ExtendedMatch(_) => QuestionType::ExtendedMatch,
        }
    }
}

/// A question being created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub id: String,
    pub title: Option<String>,
    pub points: Option<f64>,
    pub help: Option<String>,
    pub answer: DraftAnswer,
    /// Id of the persisted question in edit mode.
    pub original_id: Option<String>,
}

impl QuestionDraft {
    /// Empty draft (create mode).
    pub fn new(kind: QuestionType) -> Self {
        Self {
            id: String::new(),
            title: None,
            points: None,
            help: None,
            answer: DraftAnswer::empty(kind),
            original_id: None,
        }
    }

    /// Draft hydrated from a persisted question (edit mode).
    pub fn from_question(question: &Question) -> Result<Self> {
        let answer = match &question.answer_options {
            AnswerOptions::MultipleChoice(options) => DraftAnswer::MultipleChoice(options.clone()),
            AnswerOptions::MultipleResponse(options) => {
                DraftAnswer::MultipleResponse(options.clone())
            }
            AnswerOptions::GapText(gaps) => DraftAnswer::GapText(editable_text(gaps)?),
            AnswerOptions::GapTextDropdown(gaps) => {
                DraftAnswer::GapTextDropdown(editable_text(gaps)?)
            }
            AnswerOptions::ExtendedMatch(payload) => {
                DraftAnswer::ExtendedMatch(ExtendedMatchGraph::from_payload(payload))
            }
        };
        Ok(Self {
            id: question.id.clone(),
            title: question.title.clone(),
            points: question.points,
            help: question.help.clone(),
            answer,
            original_id: Some(question.id.clone()),
        })
    }

    pub fn question_type(&self) -> QuestionType {
        self.answer.question_type()
    }

    /// Switch the question type.
    ///
    /// Options carry over between multiple-choice and multiple-response, and
    /// the editable text between the two gap text types; any other switch
    /// starts from an empty payload.
    pub fn set_type(&mut self, kind: QuestionType) {
        if kind == self.question_type() {
            return;
        }
        let previous = std::mem::replace(&mut self.answer, DraftAnswer::empty(kind));
        self.answer = match (previous, kind) {
            (DraftAnswer::MultipleChoice(o), QuestionType::MultipleResponse) => {
                DraftAnswer::MultipleResponse(o)
            }
            (DraftAnswer::MultipleResponse(mut o), QuestionType::MultipleChoice) => {
                keep_first_correct(&mut o);
                DraftAnswer::MultipleChoice(o)
            }
            (DraftAnswer::GapText(t), QuestionType::GapTextDropdown) => {
                DraftAnswer::GapTextDropdown(t)
            }
            (DraftAnswer::GapTextDropdown(t), QuestionType::GapText) => DraftAnswer::GapText(t),
            _ => DraftAnswer::empty(kind),
        };
    }

    pub fn options(&self) -> Option<&[ChoiceOption]> {
        match &self.answer {
            DraftAnswer::MultipleChoice(o) | DraftAnswer::MultipleResponse(o) => Some(o),
            _ => None,
        }
    }

    fn options_mut(&mut self) -> Option<&mut Vec<ChoiceOption>> {
        match &mut self.answer {
            DraftAnswer::MultipleChoice(o) | DraftAnswer::MultipleResponse(o) => Some(o),
            _ => None,
        }
    }

    /// Append an empty option and return its id.
    pub fn add_option(&mut self) -> Option<String> {
        let options = self.options_mut()?;
        let id = next_unused_id("option", options.iter().map(|o| o.id.as_str()));
        options.push(ChoiceOption::new(id.clone(), "", false));
        Some(id)
    }

    pub fn remove_option(&mut self, id: &str) -> bool {
        let Some(options) = self.options_mut() else {
            return false;
        };
        let before = options.len();
        options.retain(|o| o.id != id);
        options.len() != before
    }

    pub fn set_option_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self
            .options_mut()
            .and_then(|options| options.iter_mut().find(|o| o.id == id))
        {
            Some(option) => {
                option.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Mark or unmark an option as correct.
    ///
    /// Multiple-choice behaves like a radio group: the clicked option becomes
    /// the only correct one. Multiple-response flips the clicked option.
    pub fn toggle_correct(&mut self, id: &str) -> bool {
        match &mut self.answer {
            DraftAnswer::MultipleChoice(options) => {
                if !options.iter().any(|o| o.id == id) {
                    return false;
                }
                for option in options.iter_mut() {
                    option.is_correct = (option.id == id).then_some(true);
                }
                true
            }
            DraftAnswer::MultipleResponse(options) => {
                match options.iter_mut().find(|o| o.id == id) {
                    Some(option) => {
                        option.is_correct = (!option.is_correct()).then_some(true);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    pub fn temp_text(&self) -> Option<&str> {
        match &self.answer {
            DraftAnswer::GapText(t) | DraftAnswer::GapTextDropdown(t) => Some(t),
            _ => None,
        }
    }

    pub fn set_temp_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.answer {
            DraftAnswer::GapText(t) | DraftAnswer::GapTextDropdown(t) => {
                *t = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn extended_match(&self) -> Option<&ExtendedMatchGraph> {
        match &self.answer {
            DraftAnswer::ExtendedMatch(graph) => Some(graph),
            _ => None,
        }
    }

    pub fn extended_match_mut(&mut self) -> Option<&mut ExtendedMatchGraph> {
        match &mut self.answer {
            DraftAnswer::ExtendedMatch(graph) => Some(graph),
            _ => None,
        }
    }

    /// Build the persisted question without running validation.
    pub fn to_question(&self, capabilities: Capabilities) -> Result<Question> {
        let answer_options = match &self.answer {
            DraftAnswer::MultipleChoice(o) => AnswerOptions::MultipleChoice(o.clone()),
            DraftAnswer::MultipleResponse(o) => AnswerOptions::MultipleResponse(o.clone()),
            DraftAnswer::GapText(text) => {
                capabilities.require_gap_text_authoring()?;
                AnswerOptions::GapText(gap_text::decode(text)?)
            }
            DraftAnswer::GapTextDropdown(text) => {
                capabilities.require_gap_text_authoring()?;
                AnswerOptions::GapTextDropdown(gap_text::decode(text)?)
            }
            DraftAnswer::ExtendedMatch(graph) => AnswerOptions::ExtendedMatch(graph.to_payload()),
        };
        Ok(Question {
            id: self.id.trim().to_string(),
            title: non_empty(&self.title),
            points: self.points,
            help: non_empty(&self.help),
            answer_options,
        })
    }

    /// Check the draft against the ids already used in its module.
    pub fn validate(&self, existing_ids: &[String], capabilities: Capabilities) -> ValidationErrors {
        self.build(existing_ids, capabilities).1
    }

    /// Validate and, when clean, return the question to persist.
    pub fn submit(
        &self,
        existing_ids: &[String],
        capabilities: Capabilities,
    ) -> std::result::Result<Question, ValidationErrors> {
        let (question, errors) = self.build(existing_ids, capabilities);
        match question {
            Some(question) if errors.is_empty() => Ok(question),
            _ => Err(errors),
        }
    }

    fn build(
        &self,
        existing_ids: &[String],
        capabilities: Capabilities,
    ) -> (Option<Question>, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        validate_metadata(
            self.id.trim(),
            self.points,
            existing_ids,
            self.original_id.as_deref(),
            &mut errors,
        );
        match self.to_question(capabilities) {
            Ok(question) => {
                validate_answer_options(&question.answer_options, &mut errors);
                (Some(question), errors)
            }
            Err(e) => {
                let field = match e {
                    QuestionError::FeatureUnavailable { .. } => FIELD_TYPE,
                    _ => FIELD_ANSWER_OPTIONS,
                };
                errors.insert_error(field, &e);
                (None, errors)
            }
        }
    }
}

fn editable_text(gaps: &GapText) -> Result<String> {
    gap_text::encode(&gaps.text, &gaps.correct_gap_values)
}

fn keep_first_correct(options: &mut [ChoiceOption]) {
    let mut seen = false;
    for option in options.iter_mut() {
        if option.is_correct() {
            if seen {
                option.is_correct = None;
            }
            seen = true;
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
