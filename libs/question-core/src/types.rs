//! Question model shared by the editor, the evaluator and persistence.
//!
//! The persisted JSON form of a question is
//! `{id, title?, points?, help?, type, answerOptions}` where the shape of
//! `answerOptions` is selected by `type`. In Rust the pair is one tagged enum,
//! [`AnswerOptions`], so a question can never carry a payload of the wrong kind.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{QuestionError, Result};
use crate::gap_text;

/// Question type as written in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    MultipleResponse,
    GapText,
    GapTextDropdown,
    ExtendedMatch,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        Self::MultipleChoice,
        Self::MultipleResponse,
        Self::GapText,
        Self::GapTextDropdown,
        Self::ExtendedMatch,
    ];

    /// Get the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::MultipleResponse => "multiple-response",
            Self::GapText => "gap-text",
            Self::GapTextDropdown => "gap-text-dropdown",
            Self::ExtendedMatch => "extended-match",
        }
    }

    /// Parse from the wire name.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Whether the payload is a gap text template.
    pub fn is_gap_text(&self) -> bool {
        matches!(self, Self::GapText | Self::GapTextDropdown)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a multiple-choice or multiple-response question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct: is_correct.then_some(true),
        }
    }

    /// An absent flag means "not correct".
    pub fn is_correct(&self) -> bool {
        self.is_correct == Some(true)
    }
}

/// Persisted gap text: a template with `[]` markers and one accepted-value
/// list per marker, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapText {
    pub text: String,
    pub correct_gap_values: Vec<Vec<String>>,
}

impl GapText {
    pub fn new(text: impl Into<String>, correct_gap_values: Vec<Vec<String>>) -> Self {
        Self {
            text: text.into(),
            correct_gap_values,
        }
    }

    /// Number of `[]` markers in the template, not counting link, image or
    /// tag text.
    pub fn gap_count(&self) -> usize {
        gap_text::count_markers(&self.text)
    }

    /// Check that every marker has exactly one accepted-value list.
    pub fn check(&self) -> Result<()> {
        let markers = self.gap_count();
        let values = self.correct_gap_values.len();
        if markers != values {
            return Err(QuestionError::GapCountMismatch { markers, values });
        }
        Ok(())
    }

    /// Choices offered by every dropdown of a gap-text-dropdown question:
    /// all accepted values of all gaps, de-duplicated, in first-seen order.
    pub fn dropdown_choices(&self) -> Vec<String> {
        let mut choices: Vec<String> = Vec::new();
        for value in self.correct_gap_values.iter().flatten() {
            if !choices.contains(value) {
                choices.push(value.clone());
            }
        }
        choices
    }
}

/// One element on either side of an extended-match question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchElement {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// A completed line between a left and a right element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

impl MatchPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Persisted extended-match payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedMatch {
    pub left_side: Vec<MatchElement>,
    pub right_side: Vec<MatchElement>,
    pub correct_matches: Vec<MatchPair>,
}

/// Answer payload, tagged by question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerOptions {
    MultipleChoice(Vec<ChoiceOption>),
    MultipleResponse(Vec<ChoiceOption>),
    GapText(GapText),
    GapTextDropdown(GapText),
    ExtendedMatch(ExtendedMatch),
}

impl AnswerOptions {
    /// Empty payload of the given type.
    pub fn empty(kind: QuestionType) -> Self {
        match kind {
            QuestionType::MultipleChoice => Self::MultipleChoice(Vec::new()),
            QuestionType::MultipleResponse => Self::MultipleResponse(Vec::new()),
            QuestionType::GapText => Self::GapText(GapText::default()),
            QuestionType::GapTextDropdown => Self::GapTextDropdown(GapText::default()),
            QuestionType::ExtendedMatch => Self::ExtendedMatch(ExtendedMatch::default()),
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

    fn from_json(kind: QuestionType, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            QuestionType::MultipleChoice => Self::MultipleChoice(serde_json::from_value(value)?),
            QuestionType::MultipleResponse => {
                Self::MultipleResponse(serde_json::from_value(value)?)
            }
            QuestionType::GapText => Self::GapText(serde_json::from_value(value)?),
            QuestionType::GapTextDropdown => Self::GapTextDropdown(serde_json::from_value(value)?),
            QuestionType::ExtendedMatch => Self::ExtendedMatch(serde_json::from_value(value)?),
        })
    }
}

/// A question as stored in a module.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    pub id: String,
    pub title: Option<String>,
    pub points: Option<f64>,
    pub help: Option<String>,
    pub answer_options: AnswerOptions,
}

impl Question {
    pub fn new(id: impl Into<String>, answer_options: AnswerOptions) -> Self {
        Self {
            id: id.into(),
            title: None,
            points: None,
            help: None,
            answer_options,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.answer_options.question_type()
    }
}

/// Wire form used while deserializing, before `answerOptions` is checked
/// against `type`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    points: Option<f64>,
    #[serde(default)]
    help: Option<String>,
    #[serde(rename = "type")]
    kind: QuestionType,
    answer_options: serde_json::Value,
}

impl TryFrom<RawQuestion> for Question {
    type Error = serde_json::Error;

    fn try_from(raw: RawQuestion) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            answer_options: AnswerOptions::from_json(raw.kind, raw.answer_options)?,
            id: raw.id,
            title: raw.title,
            points: raw.points,
            help: raw.help,
        })
    }
}

impl Serialize for Question {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Question", 6)?;
        state.serialize_field("id", &self.id)?;
        if let Some(title) = &self.title {
            state.serialize_field("title", title)?;
        }
        if let Some(points) = &self.points {
            state.serialize_field("points", points)?;
        }
        if let Some(help) = &self.help {
            state.serialize_field("help", help)?;
        }
        state.serialize_field("type", &self.question_type())?;
        state.serialize_field("answerOptions", &self.answer_options)?;
        state.end()
    }
}

/// A named collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionModule {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionModule {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            questions: Vec::new(),
        }
    }

    pub fn question_ids(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Replace the question stored under `original_id`, or append when there
    /// is none.
    pub fn upsert_question(&mut self, question: Question, original_id: Option<&str>) {
        let slot = original_id
            .and_then(|original| self.questions.iter().position(|q| q.id == original));
        match slot {
            Some(index) => self.questions[index] = question,
            None => self.questions.push(question),
        }
    }

    /// Remove a question, returning it if it existed.
    pub fn remove_question(&mut self, id: &str) -> Option<Question> {
        let index = self.questions.iter().position(|q| q.id == id)?;
        Some(self.questions.remove(index))
    }
}
