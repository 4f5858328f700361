//! Codec between the editable gap text string and the persisted template.
//!
//! # Format
//! ```text
//! Editable:  The [cat; kitten] sat on the [mat].
//! Persisted: text = "The [] sat on the []."
//!            correctGapValues = [["cat", "kitten"], ["mat"]]
//! ```
//!
//! A bracket span followed directly by `(` is a markdown link or image; its
//! label is kept as text and its `(target)` is copied untouched. HTML tags are
//! copied untouched, and no gap is ever detected inside one. Straight quotes
//! outside tags and link targets are replaced with typographic ones.
//!
//! Templates are scanned with the same tokenizer, so a `[]` that belongs to a
//! link, an image or a tag (`![](img.png)`, `<a title="[]">`) is never counted
//! as a gap marker.
//!
//! Detection is a two-pass scan (tags first, then brackets in the remaining
//! text) and needs no regex lookbehind, so gap-text authoring is always
//! available here. [`Capabilities`] still carries the flag so hosts can turn
//! the feature off.

use serde::{Deserialize, Serialize};

use crate::error::{QuestionError, Result};
use crate::types::GapText;

/// Marker for a gap in the persisted template.
pub const GAP_MARKER: &str = "[]";

/// Separator between accepted values inside an editable gap.
pub const VALUE_SEPARATOR: char = ';';

const OPENING_QUOTE: char = '\u{201E}';
const CLOSING_QUOTE: char = '\u{201C}';
const APOSTROPHE: char = '\u{2018}';

/// Optional features a host may switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub gap_text_authoring: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            gap_text_authoring: true,
        }
    }
}

impl Capabilities {
    /// Fail with `FeatureUnavailable` when gap-text authoring is off.
    pub fn require_gap_text_authoring(&self) -> Result<()> {
        if self.gap_text_authoring {
            Ok(())
        } else {
            Err(QuestionError::FeatureUnavailable {
                feature: "gap text authoring",
            })
        }
    }
}

/// Decode an editable string into a template and accepted values.
pub fn decode(raw: &str) -> Result<GapText> {
    let mut quotes = QuoteNormalizer::default();
    let mut template = String::with_capacity(raw.len());
    let mut correct_gap_values = Vec::new();

    for token in tokenize(raw) {
        match token {
            Token::Tag(s) => template.push_str(s),
            Token::Link(s) => {
                // The label never contains `]`, so the first one closes it.
                let (label, target) = s.split_at(s.find(']').unwrap_or(s.len()));
                template.push('[');
                quotes.push_normalized(&mut template, &label[1..]);
                template.push_str(target);
            }
            Token::Text(s) => quotes.push_normalized(&mut template, s),
            Token::Gap(content) => {
                let mut normalized = String::with_capacity(content.len());
                quotes.push_normalized(&mut normalized, content);
                let accepted = split_accepted_values(&normalized);
                if accepted.is_empty() {
                    return Err(QuestionError::InvalidGapSpan {
                        index: correct_gap_values.len(),
                        content: content.to_string(),
                    });
                }
                correct_gap_values.push(accepted);
                template.push_str(GAP_MARKER);
            }
        }
    }

    Ok(GapText {
        text: template,
        correct_gap_values,
    })
}

/// Encode a template and its accepted values back into the editable string.
pub fn encode(template: &str, correct_gap_values: &[Vec<String>]) -> Result<String> {
    let segments = template_segments(template);
    let markers = segments.len() - 1;
    if markers != correct_gap_values.len() {
        return Err(QuestionError::GapCountMismatch {
            markers,
            values: correct_gap_values.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    for (segment, accepted) in segments.iter().zip(correct_gap_values) {
        out.push_str(segment);
        out.push('[');
        out.push_str(&accepted.join("; "));
        out.push(']');
    }
    out.push_str(&segments[markers]);
    Ok(out)
}

/// Number of gap markers in a persisted template.
///
/// A `[]` that is part of a link, an image or a tag is not a marker.
pub fn count_markers(template: &str) -> usize {
    tokenize(template)
        .into_iter()
        .filter(|token| *token == Token::Gap(""))
        .count()
}

/// Template text between gap markers; always one more segment than markers.
fn template_segments(template: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for token in tokenize(template) {
        match token {
            Token::Gap("") => segments.push(std::mem::take(&mut current)),
            Token::Gap(content) => {
                current.push('[');
                current.push_str(content);
                current.push(']');
            }
            Token::Tag(s) | Token::Link(s) | Token::Text(s) => current.push_str(s),
        }
    }
    segments.push(current);
    segments
}

/// Replace every gap span with the bare marker, leaving everything else as is.
pub fn remove_gap_content(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in tokenize(text) {
        match token {
            Token::Gap(_) => out.push_str(GAP_MARKER),
            Token::Tag(s) | Token::Link(s) | Token::Text(s) => out.push_str(s),
        }
    }
    out
}

fn split_accepted_values(content: &str) -> Vec<String> {
    content
        .split(VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// `<tag ...>`, copied verbatim.
    Tag(&'a str),
    /// `[label](target)` or the bracket part of `![alt](target)`.
    Link(&'a str),
    /// Inner content of a gap span, without the brackets.
    Gap(&'a str),
    Text(&'a str),
}

/// Split input into tag, link, gap and text tokens.
///
/// Every delimiter looked at is ASCII, so byte offsets always fall on char
/// boundaries.
fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let next = match bytes[i] {
            b'<' if is_tag_start(input, i) => {
                let end = input[i..].find('>').map_or(input.len(), |p| i + p + 1);
                Some((Token::Tag(&input[i..end]), end))
            }
            b'[' => match bracket_span(input, i) {
                Some(BracketSpan::Link { end }) => Some((Token::Link(&input[i..end]), end)),
                Some(BracketSpan::Gap { close }) => {
                    Some((Token::Gap(&input[i + 1..close]), close + 1))
                }
                None => None,
            },
            _ => None,
        };

        match next {
            Some((token, end)) => {
                if text_start < i {
                    tokens.push(Token::Text(&input[text_start..i]));
                }
                tokens.push(token);
                i = end;
                text_start = end;
            }
            None => i += 1,
        }
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

fn is_tag_start(input: &str, at: usize) -> bool {
    input[at + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

enum BracketSpan {
    Link { end: usize },
    Gap { close: usize },
}

/// Classify the span opened at `open`.
///
/// Returns `None` when the `[` is literal: another `[`, a line break or a tag
/// comes before the closing `]`, so only the innermost bracket pair on a line
/// can form a gap.
fn bracket_span(input: &str, open: usize) -> Option<BracketSpan> {
    for (offset, c) in input[open + 1..].char_indices() {
        let at = open + 1 + offset;
        match c {
            ']' => {
                let after = &input[at + 1..];
                if !after.starts_with('(') {
                    return Some(BracketSpan::Gap { close: at });
                }
                // Link target runs to the first `)`; an unterminated target
                // leaves only the label bracket verbatim.
                let end = after.find(')').map_or(at + 1, |p| at + 1 + p + 1);
                return Some(BracketSpan::Link { end });
            }
            '[' | '\n' => return None,
            '<' if is_tag_start(input, at) => return None,
            _ => {}
        }
    }
    None
}

/// Alternates opening and closing quotes across the whole input.
#[derive(Default)]
struct QuoteNormalizer {
    inside_quote: bool,
}

impl QuoteNormalizer {
    fn push_normalized(&mut self, out: &mut String, text: &str) {
        for c in text.chars() {
            match c {
                '"' => {
                    out.push(if self.inside_quote {
                        CLOSING_QUOTE
                    } else {
                        OPENING_QUOTE
                    });
                    self.inside_quote = !self.inside_quote;
                }
                '\'' => out.push(APOSTROPHE),
                _ => out.push(c),
            }
        }
    }
}
