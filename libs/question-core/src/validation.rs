//! Checks run before a question is handed to persistence.
//!
//! Validation never fails; it collects one human-readable message per field
//! and leaves the decision to block submission to the caller.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{QuestionError, Result};
use crate::extended_match::Side;
use crate::types::{
    AnswerOptions, ChoiceOption, ExtendedMatch, GapText, MatchElement, Question, QuestionModule,
};

pub const FIELD_ID: &str = "id";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_POINTS: &str = "points";
pub const FIELD_ANSWER_OPTIONS: &str = "answerOptions";
pub const FIELD_LEFT_SIDE: &str = "answerOptions.leftSide";
pub const FIELD_RIGHT_SIDE: &str = "answerOptions.rightSide";
pub const FIELD_CORRECT_MATCHES: &str = "answerOptions.correctMatches";
pub const FIELD_NAME: &str = "name";

/// Field name to message. The first message recorded for a field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn insert_error(&mut self, field: &str, error: &QuestionError) {
        self.insert(field, error.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result<T>(self, value: T) -> std::result::Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Question ids end up in URL path segments.
pub fn validate_id(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        Some("must not be empty")
    } else if id.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Some("may only contain letters, digits, '-' and '_'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(QuestionError::InvalidId {
            value: id.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Validate a question against the ids already used in its module.
///
/// `original_id` is the id the question had when editing started; keeping it
/// unchanged is not a conflict.
pub fn validate_question(
    question: &Question,
    existing_ids: &[String],
    original_id: Option<&str>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    validate_metadata(
        &question.id,
        question.points,
        existing_ids,
        original_id,
        &mut errors,
    );
    validate_answer_options(&question.answer_options, &mut errors);
    errors
}

/// Validate a whole module before it replaces the stored one.
///
/// Question fields are reported as `questions[<index>].<field>`.
pub fn validate_module(module: &QuestionModule) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Err(e) = validate_id(&module.id) {
        errors.insert_error(FIELD_ID, &e);
    }
    if module.name.trim().is_empty() {
        errors.insert(FIELD_NAME, "name must not be empty");
    }

    let mut seen: Vec<String> = Vec::with_capacity(module.questions.len());
    for (index, question) in module.questions.iter().enumerate() {
        let question_errors = validate_question(question, &seen, None);
        for (field, message) in question_errors.iter() {
            errors.insert(&format!("questions[{}].{}", index, field), message);
        }
        seen.push(question.id.clone());
    }
    errors
}

/// Id and points checks shared by persisted questions and editor drafts.
pub fn validate_metadata(
    id: &str,
    points: Option<f64>,
    existing_ids: &[String],
    original_id: Option<&str>,
    errors: &mut ValidationErrors,
) {
    if let Err(e) = validate_id(id) {
        errors.insert_error(FIELD_ID, &e);
    } else if original_id != Some(id) && existing_ids.iter().any(|existing| existing == id) {
        errors.insert_error(FIELD_ID, &QuestionError::DuplicateId { id: id.to_string() });
    }

    if let Some(points) = points {
        if !points.is_finite() || points < 0.0 {
            errors.insert(FIELD_POINTS, "points must be a number of at least 0");
        }
    }
}

/// Per-type payload checks.
pub fn validate_answer_options(options: &AnswerOptions, errors: &mut ValidationErrors) {
    match options {
        AnswerOptions::MultipleChoice(choices) => {
            validate_choices(choices, errors);
            if choices.iter().filter(|o| o.is_correct()).count() != 1 {
                errors.insert_error(
                    FIELD_ANSWER_OPTIONS,
                    &incomplete("exactly one option must be marked correct"),
                );
            }
        }
        AnswerOptions::MultipleResponse(choices) => {
            validate_choices(choices, errors);
            if !choices.iter().any(ChoiceOption::is_correct) {
                errors.insert_error(
                    FIELD_ANSWER_OPTIONS,
                    &incomplete("at least one option must be marked correct"),
                );
            }
        }
        AnswerOptions::GapText(gaps) | AnswerOptions::GapTextDropdown(gaps) => {
            validate_gaps(gaps, errors);
        }
        AnswerOptions::ExtendedMatch(payload) => validate_extended_match(payload, errors),
    }
}

fn incomplete(reason: &str) -> QuestionError {
    QuestionError::IncompleteAnswerPayload {
        reason: reason.to_string(),
    }
}

fn validate_choices(choices: &[ChoiceOption], errors: &mut ValidationErrors) {
    if let Some(id) = first_duplicate(choices.iter().map(|o| o.id.as_str())) {
        errors.insert_error(FIELD_ANSWER_OPTIONS, &QuestionError::DuplicateId { id });
    }
    if !choices.iter().any(|o| !o.text.trim().is_empty()) {
        errors.insert_error(
            FIELD_ANSWER_OPTIONS,
            &incomplete("at least one option needs text"),
        );
    }
}

fn validate_gaps(gaps: &GapText, errors: &mut ValidationErrors) {
    if let Err(e) = gaps.check() {
        errors.insert_error(FIELD_ANSWER_OPTIONS, &e);
        return;
    }
    if gaps.correct_gap_values.is_empty() {
        errors.insert_error(FIELD_ANSWER_OPTIONS, &incomplete("the text needs at least one gap"));
        return;
    }
    let invalid = gaps
        .correct_gap_values
        .iter()
        .position(|accepted| accepted.is_empty() || accepted.iter().any(|v| v.trim().is_empty()));
    if let Some(index) = invalid {
        errors.insert_error(
            FIELD_ANSWER_OPTIONS,
            &QuestionError::InvalidGapSpan {
                index,
                content: gaps.correct_gap_values[index].join("; "),
            },
        );
    }
}

fn validate_extended_match(payload: &ExtendedMatch, errors: &mut ValidationErrors) {
    let sides = [
        (&payload.left_side, FIELD_LEFT_SIDE),
        (&payload.right_side, FIELD_RIGHT_SIDE),
    ];
    for (elements, field) in sides {
        if let Some(id) = first_duplicate(elements.iter().map(|e| e.id.as_str())) {
            errors.insert_error(field, &QuestionError::DuplicateId { id });
        }
    }

    fn has(elements: &[MatchElement], id: &str) -> bool {
        elements.iter().any(|e| e.id == id)
    }
    for pair in &payload.correct_matches {
        let dangling = if !has(&payload.left_side, &pair.left) {
            Some((Side::Left, &pair.left))
        } else if !has(&payload.right_side, &pair.right) {
            Some((Side::Right, &pair.right))
        } else {
            None
        };
        if let Some((side, id)) = dangling {
            errors.insert_error(
                FIELD_CORRECT_MATCHES,
                &QuestionError::DanglingMatchReference {
                    side,
                    id: id.clone(),
                },
            );
        }
    }

    let pair_keys = payload
        .correct_matches
        .iter()
        .map(|pair| format!("{}/{}", pair.left, pair.right))
        .collect::<Vec<_>>();
    if let Some(id) = first_duplicate(pair_keys.iter().map(String::as_str)) {
        errors.insert_error(FIELD_CORRECT_MATCHES, &QuestionError::DuplicateId { id });
    }

    if payload.correct_matches.is_empty() {
        errors.insert_error(
            FIELD_CORRECT_MATCHES,
            &incomplete("at least one match line must be drawn"),
        );
    }
}

fn first_duplicate<'a>(ids: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Some(id.to_string());
        }
    }
    None
}
