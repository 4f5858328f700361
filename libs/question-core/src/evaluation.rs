//! Grading of practice responses against persisted questions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{AnswerOptions, ChoiceOption, GapText, MatchPair, Question, QuestionType};

/// A learner's in-progress answer, captured by the practice UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Response {
    /// Selected option id, if any.
    MultipleChoice(Option<String>),
    /// Selected option ids.
    MultipleResponse(BTreeSet<String>),
    /// One entry per gap, aligned by index.
    GapText(Vec<Option<String>>),
    /// One selected choice per gap, aligned by index.
    GapTextDropdown(Vec<Option<String>>),
    /// Drawn lines.
    ExtendedMatch(BTreeSet<MatchPair>),
}

impl Response {
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

/// Per-part data for rendering corrections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EvaluationDetail {
    MultipleChoice {
        /// Ids of the correct options.
        correct: Vec<String>,
    },
    MultipleResponse {
        /// Correct options that were not selected.
        missed: Vec<String>,
        /// Selected options that are not correct.
        unexpected: Vec<String>,
    },
    Gaps {
        gaps: Vec<bool>,
    },
    ExtendedMatch {
        missing: Vec<MatchPair>,
        unexpected: Vec<MatchPair>,
    },
    /// The response was captured for a different question type.
    TypeMismatch {
        expected: QuestionType,
    },
}

/// Verdict for one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub is_correct: bool,
    pub detail: EvaluationDetail,
}

/// Grade a response.
///
/// Malformed responses are graded as incorrect. The only error is a gap text
/// whose marker count disagrees with its accepted values.
pub fn evaluate(question: &Question, response: &Response) -> Result<Evaluation> {
    let evaluation = match (&question.answer_options, response) {
        (AnswerOptions::MultipleChoice(options), Response::MultipleChoice(selected)) => {
            evaluate_multiple_choice(options, selected.as_deref())
        }
        (AnswerOptions::MultipleResponse(options), Response::MultipleResponse(selected)) => {
            evaluate_multiple_response(options, selected)
        }
        (AnswerOptions::GapText(gaps), Response::GapText(answers)) => {
            evaluate_gaps(gaps, answers, accepts_typed)?
        }
        (AnswerOptions::GapTextDropdown(gaps), Response::GapTextDropdown(answers)) => {
            evaluate_gaps(gaps, answers, accepts_selected)?
        }
        (AnswerOptions::ExtendedMatch(payload), Response::ExtendedMatch(drawn)) => {
            evaluate_extended_match(&payload.correct_matches, drawn)
        }
        _ => {
            tracing::warn!(
                question = %question.id,
                expected = %question.question_type(),
                got = %response.question_type(),
                "Response type does not match question type"
            );
            Evaluation {
                is_correct: false,
                detail: EvaluationDetail::TypeMismatch {
                    expected: question.question_type(),
                },
            }
        }
    };
    Ok(evaluation)
}

fn evaluate_multiple_choice(options: &[ChoiceOption], selected: Option<&str>) -> Evaluation {
    let is_correct = selected
        .and_then(|id| options.iter().find(|o| o.id == id))
        .is_some_and(ChoiceOption::is_correct);
    Evaluation {
        is_correct,
        detail: EvaluationDetail::MultipleChoice {
            correct: correct_ids(options).cloned().collect(),
        },
    }
}

fn evaluate_multiple_response(options: &[ChoiceOption], selected: &BTreeSet<String>) -> Evaluation {
    let correct: BTreeSet<String> = correct_ids(options).cloned().collect();
    let missed: Vec<String> = correct.difference(selected).cloned().collect();
    let unexpected: Vec<String> = selected.difference(&correct).cloned().collect();
    Evaluation {
        is_correct: missed.is_empty() && unexpected.is_empty(),
        detail: EvaluationDetail::MultipleResponse { missed, unexpected },
    }
}

fn correct_ids(options: &[ChoiceOption]) -> impl Iterator<Item = &String> {
    options.iter().filter(|o| o.is_correct()).map(|o| &o.id)
}

fn evaluate_gaps(
    gaps: &GapText,
    answers: &[Option<String>],
    accepts: fn(&[String], &str) -> bool,
) -> Result<Evaluation> {
    gaps.check()?;
    let results: Vec<bool> = gaps
        .correct_gap_values
        .iter()
        .enumerate()
        .map(|(index, accepted)| {
            answers
                .get(index)
                .and_then(Option::as_deref)
                .is_some_and(|answer| accepts(accepted, answer))
        })
        .collect();
    Ok(Evaluation {
        is_correct: results.iter().all(|&ok| ok),
        detail: EvaluationDetail::Gaps { gaps: results },
    })
}

/// Typed gaps: trimmed, case-insensitive. Inner whitespace is compared as is.
fn accepts_typed(accepted: &[String], answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    accepted
        .iter()
        .any(|value| value.trim().to_lowercase() == answer)
}

/// Dropdown gaps: exact match against one of the accepted values.
fn accepts_selected(accepted: &[String], answer: &str) -> bool {
    accepted.iter().any(|value| value == answer)
}

fn evaluate_extended_match(correct: &[MatchPair], drawn: &BTreeSet<MatchPair>) -> Evaluation {
    let correct: BTreeSet<MatchPair> = correct.iter().cloned().collect();
    let missing: Vec<MatchPair> = correct.difference(drawn).cloned().collect();
    let unexpected: Vec<MatchPair> = drawn.difference(&correct).cloned().collect();
    Evaluation {
        is_correct: missing.is_empty() && unexpected.is_empty(),
        detail: EvaluationDetail::ExtendedMatch {
            missing,
            unexpected,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuestionError;
    use crate::types::{ExtendedMatch, MatchElement};
    use pretty_assertions::assert_eq;

    fn set<const N: usize>(ids: [&str; N]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn pairs<const N: usize>(list: [(&str, &str); N]) -> BTreeSet<MatchPair> {
        list.iter().map(|(l, r)| MatchPair::new(*l, *r)).collect()
    }

    fn answers(list: &[&str]) -> Vec<Option<String>> {
        list.iter().map(|s| Some(s.to_string())).collect()
    }

    fn choice_question(options: Vec<ChoiceOption>, multiple: bool) -> Question {
        let payload = if multiple {
            AnswerOptions::MultipleResponse(options)
        } else {
            AnswerOptions::MultipleChoice(options)
        };
        Question::new("q", payload)
    }

    fn gap_question(values: &[&[&str]], dropdown: bool) -> Question {
        let text = vec!["[]"; values.len()].join(" ");
        let gaps = GapText::new(
            text,
            values
                .iter()
                .map(|v| v.iter().map(|s| s.to_string()).collect())
                .collect(),
        );
        let payload = if dropdown {
            AnswerOptions::GapTextDropdown(gaps)
        } else {
            AnswerOptions::GapText(gaps)
        };
        Question::new("q", payload)
    }

    #[test]
    fn multiple_choice_checks_selected_option() {
        let question = choice_question(
            vec![
                ChoiceOption::new("o0", "Yes", false),
                ChoiceOption::new("o1", "No", true),
            ],
            false,
        );
        let right = evaluate(&question, &Response::MultipleChoice(Some("o1".into()))).unwrap();
        assert!(right.is_correct);
        assert_eq!(
            right.detail,
            EvaluationDetail::MultipleChoice {
                correct: vec!["o1".to_string()]
            }
        );
        let wrong = evaluate(&question, &Response::MultipleChoice(Some("o0".into()))).unwrap();
        assert!(!wrong.is_correct);
        let unknown = evaluate(&question, &Response::MultipleChoice(Some("o9".into()))).unwrap();
        assert!(!unknown.is_correct);
        let none = evaluate(&question, &Response::MultipleChoice(None)).unwrap();
        assert!(!none.is_correct);
    }

    #[test]
    fn multiple_response_requires_exact_set() {
        let question = choice_question(
            vec![
                ChoiceOption::new("o0", "a", true),
                ChoiceOption::new("o1", "b", true),
                ChoiceOption::new("o2", "c", false),
            ],
            true,
        );
        let exact = evaluate(&question, &Response::MultipleResponse(set(["o0", "o1"]))).unwrap();
        assert!(exact.is_correct);

        let subset = evaluate(&question, &Response::MultipleResponse(set(["o0"]))).unwrap();
        assert!(!subset.is_correct);
        assert_eq!(
            subset.detail,
            EvaluationDetail::MultipleResponse {
                missed: vec!["o1".to_string()],
                unexpected: vec![],
            }
        );

        let superset =
            evaluate(&question, &Response::MultipleResponse(set(["o0", "o1", "o2"]))).unwrap();
        assert!(!superset.is_correct);
    }

    #[test]
    fn gap_text_is_trimmed_and_case_insensitive() {
        let question = gap_question(&[&["multiple", "more than one"]], false);
        let right = evaluate(&question, &Response::GapText(answers(&["MORE THAN ONE "]))).unwrap();
        assert!(right.is_correct);
        let wrong = evaluate(&question, &Response::GapText(answers(&["several"]))).unwrap();
        assert!(!wrong.is_correct);
    }

    #[test]
    fn gap_text_does_not_collapse_inner_whitespace() {
        let question = gap_question(&[&["more than one"]], false);
        let result = evaluate(&question, &Response::GapText(answers(&["more  than one"]))).unwrap();
        assert!(!result.is_correct);
    }

    #[test]
    fn gap_text_reports_each_gap_and_tolerates_missing_entries() {
        let question = gap_question(&[&["a"], &["b"], &["c"]], false);
        let result = evaluate(
            &question,
            &Response::GapText(vec![Some("a".into()), None]),
        )
        .unwrap();
        assert!(!result.is_correct);
        assert_eq!(
            result.detail,
            EvaluationDetail::Gaps {
                gaps: vec![true, false, false]
            }
        );
    }

    #[test]
    fn dropdown_is_case_sensitive() {
        let question = gap_question(&[&["Paris"]], true);
        let right =
            evaluate(&question, &Response::GapTextDropdown(answers(&["Paris"]))).unwrap();
        assert!(right.is_correct);
        let wrong =
            evaluate(&question, &Response::GapTextDropdown(answers(&["paris"]))).unwrap();
        assert!(!wrong.is_correct);
    }

    #[test]
    fn corrupted_gap_text_is_an_error() {
        let question = Question::new(
            "q",
            AnswerOptions::GapText(GapText::new("[] []", vec![vec!["a".to_string()]])),
        );
        let result = evaluate(&question, &Response::GapText(answers(&["a", "b"])));
        assert_eq!(
            result,
            Err(QuestionError::GapCountMismatch { markers: 2, values: 1 })
        );
    }

    #[test]
    fn extended_match_requires_exact_pair_set() {
        let question = Question::new(
            "q",
            AnswerOptions::ExtendedMatch(ExtendedMatch {
                left_side: vec![
                    MatchElement { id: "l0".into(), text: "A".into() },
                    MatchElement { id: "l1".into(), text: "B".into() },
                ],
                right_side: vec![
                    MatchElement { id: "r0".into(), text: "X".into() },
                    MatchElement { id: "r1".into(), text: "Y".into() },
                ],
                correct_matches: vec![MatchPair::new("l0", "r0"), MatchPair::new("l1", "r0")],
            }),
        );

        let exact = Response::ExtendedMatch(pairs([("l1", "r0"), ("l0", "r0")]));
        assert!(evaluate(&question, &exact).unwrap().is_correct);

        let missing = Response::ExtendedMatch(pairs([("l0", "r0")]));
        let result = evaluate(&question, &missing).unwrap();
        assert!(!result.is_correct);
        assert_eq!(
            result.detail,
            EvaluationDetail::ExtendedMatch {
                missing: vec![MatchPair::new("l1", "r0")],
                unexpected: vec![],
            }
        );

        let extra = Response::ExtendedMatch(pairs([("l0", "r0"), ("l1", "r0"), ("l0", "r1")]));
        assert!(!evaluate(&question, &extra).unwrap().is_correct);
    }

    #[test]
    fn mismatched_response_type_is_incorrect() {
        let question = gap_question(&[&["a"]], false);
        let result = evaluate(&question, &Response::MultipleChoice(Some("a".into()))).unwrap();
        assert!(!result.is_correct);
        assert_eq!(
            result.detail,
            EvaluationDetail::TypeMismatch {
                expected: QuestionType::GapText
            }
        );
    }

    #[test]
    fn response_json_shape() {
        let response: Response = serde_json::from_str(
            r#"{"type": "extended-match", "value": [{"left": "l0", "right": "r0"}]}"#,
        )
        .unwrap();
        assert_eq!(response, Response::ExtendedMatch(pairs([("l0", "r0")])));
    }
}
