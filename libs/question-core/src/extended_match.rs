//! Editor model for extended-match questions.
//!
//! Elements on both sides are addressed by stable string ids, and match lines
//! store id pairs only. A line is drawn with two clicks: the first click
//! leaves an incomplete line and a pending endpoint, the second click on the
//! opposite side completes it.

use serde::{Deserialize, Serialize};

use crate::types::{ExtendedMatch, MatchElement, MatchPair};

/// Side of an extended-match question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a line that is still being drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub side: Side,
    pub id: String,
}

/// A match line in the editor. Only the last line may be incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

impl MatchLine {
    fn with_endpoint(side: Side, id: &str) -> Self {
        let mut line = Self::default();
        *line.slot_mut(side) = Some(id.to_string());
        line
    }

    pub fn endpoint(&self, side: Side) -> Option<&str> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<String> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    pub fn as_pair(&self) -> Option<MatchPair> {
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => Some(MatchPair::new(left.clone(), right.clone())),
            _ => None,
        }
    }

    fn references(&self, side: Side, id: &str) -> bool {
        self.endpoint(side) == Some(id)
    }
}

/// What a call to [`ExtendedMatchGraph::toggle_endpoint`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new incomplete line was started.
    Started,
    /// The incomplete line was completed.
    Completed(MatchPair),
    /// The pending endpoint moved to another element on the same side.
    Moved,
    /// The pair already existed; the incomplete line was dropped.
    Duplicate(MatchPair),
}

/// Bipartite pairing under construction in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedMatchGraph {
    pub left_side: Vec<MatchElement>,
    pub right_side: Vec<MatchElement>,
    pub correct_matches: Vec<MatchLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_endpoint: Option<Endpoint>,
}

impl ExtendedMatchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a persisted payload.
    pub fn from_payload(payload: &ExtendedMatch) -> Self {
        Self {
            left_side: payload.left_side.clone(),
            right_side: payload.right_side.clone(),
            correct_matches: payload
                .correct_matches
                .iter()
                .map(|pair| MatchLine {
                    left: Some(pair.left.clone()),
                    right: Some(pair.right.clone()),
                })
                .collect(),
            pending_endpoint: None,
        }
    }

    /// Persisted payload with incomplete lines left out.
    pub fn to_payload(&self) -> ExtendedMatch {
        let dropped = self.correct_matches.len() - self.completed_matches().len();
        if dropped > 0 {
            tracing::debug!("Dropping {} incomplete match line(s)", dropped);
        }
        ExtendedMatch {
            left_side: self.left_side.clone(),
            right_side: self.right_side.clone(),
            correct_matches: self.completed_matches(),
        }
    }

    pub fn elements(&self, side: Side) -> &[MatchElement] {
        match side {
            Side::Left => &self.left_side,
            Side::Right => &self.right_side,
        }
    }

    fn elements_mut(&mut self, side: Side) -> &mut Vec<MatchElement> {
        match side {
            Side::Left => &mut self.left_side,
            Side::Right => &mut self.right_side,
        }
    }

    /// Lowest `<side>-<n>` id not used on that side.
    pub fn next_unused_id(&self, side: Side) -> String {
        next_unused_id(side.as_str(), self.elements(side).iter().map(|e| e.id.as_str()))
    }

    /// Append an empty element and return its id.
    pub fn add_element(&mut self, side: Side) -> String {
        let id = self.next_unused_id(side);
        self.elements_mut(side).push(MatchElement {
            id: id.clone(),
            text: String::new(),
        });
        id
    }

    /// Set an element's text. Returns false if the id is unknown.
    pub fn set_text(&mut self, side: Side, id: &str, text: impl Into<String>) -> bool {
        match self.elements_mut(side).iter_mut().find(|e| e.id == id) {
            Some(element) => {
                element.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Remove an element and every line attached to it.
    pub fn remove_element(&mut self, side: Side, id: &str) -> bool {
        let elements = self.elements_mut(side);
        let before = elements.len();
        elements.retain(|e| e.id != id);
        let removed = elements.len() != before;

        self.correct_matches.retain(|line| !line.references(side, id));
        if self
            .pending_endpoint
            .as_ref()
            .is_some_and(|p| p.side == side && p.id == id)
        {
            self.pending_endpoint = None;
        }
        removed
    }

    fn incomplete_line(&self) -> Option<&MatchLine> {
        self.correct_matches.last().filter(|line| !line.is_complete())
    }

    /// Handle a click on an element while drawing lines.
    pub fn toggle_endpoint(&mut self, side: Side, id: &str) -> ToggleOutcome {
        let Some(line) = self.incomplete_line().cloned() else {
            self.correct_matches.push(MatchLine::with_endpoint(side, id));
            self.pending_endpoint = Some(Endpoint {
                side,
                id: id.to_string(),
            });
            return ToggleOutcome::Started;
        };

        if line.endpoint(side).is_some() {
            if let Some(last) = self.correct_matches.last_mut() {
                *last.slot_mut(side) = Some(id.to_string());
            }
            self.pending_endpoint = Some(Endpoint {
                side,
                id: id.to_string(),
            });
            return ToggleOutcome::Moved;
        }

        let other = line.endpoint(side.opposite()).unwrap_or_default().to_string();
        let pair = match side {
            Side::Left => MatchPair::new(id, other),
            Side::Right => MatchPair::new(other, id),
        };
        self.pending_endpoint = None;

        let complete_count = self.correct_matches.len() - 1;
        let is_duplicate = self.correct_matches[..complete_count]
            .iter()
            .any(|existing| existing.as_pair().as_ref() == Some(&pair));

        if is_duplicate {
            tracing::warn!(
                left = %pair.left,
                right = %pair.right,
                "Match already exists, ignoring duplicate line"
            );
            self.correct_matches.pop();
            return ToggleOutcome::Duplicate(pair);
        }

        if let Some(last) = self.correct_matches.last_mut() {
            *last.slot_mut(side) = Some(id.to_string());
        }
        ToggleOutcome::Completed(pair)
    }

    /// Drop the incomplete line, if any.
    pub fn cancel_pending(&mut self) {
        if self.incomplete_line().is_some() {
            self.correct_matches.pop();
        }
        self.pending_endpoint = None;
    }

    /// Remove a completed line. Returns false if it did not exist.
    pub fn remove_match(&mut self, left: &str, right: &str) -> bool {
        let before = self.correct_matches.len();
        self.correct_matches.retain(|line| {
            !(line.left.as_deref() == Some(left) && line.right.as_deref() == Some(right))
        });
        self.correct_matches.len() != before
    }

    /// Completed lines only, in drawing order.
    pub fn completed_matches(&self) -> Vec<MatchPair> {
        self.correct_matches
            .iter()
            .filter_map(MatchLine::as_pair)
            .collect()
    }
}

/// Lowest `<prefix>-<n>` not present in `used`.
pub(crate) fn next_unused_id<'a>(prefix: &str, used: impl Iterator<Item = &'a str>) -> String {
    let taken: std::collections::HashSet<u64> = used
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok())
        .collect();
    let n = (0..).find(|n| !taken.contains(n)).unwrap_or_default();
    format!("{}-{}", prefix, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph_with(left: usize, right: usize) -> ExtendedMatchGraph {
        let mut graph = ExtendedMatchGraph::new();
        for _ in 0..left {
            graph.add_element(Side::Left);
        }
        for _ in 0..right {
            graph.add_element(Side::Right);
        }
        graph
    }

    fn connect(graph: &mut ExtendedMatchGraph, left: &str, right: &str) -> ToggleOutcome {
        graph.toggle_endpoint(Side::Left, left);
        graph.toggle_endpoint(Side::Right, right)
    }

    #[test]
    fn add_element_reuses_lowest_free_id() {
        let mut graph = graph_with(3, 0);
        assert!(graph.remove_element(Side::Left, "left-1"));
        assert_eq!(graph.add_element(Side::Left), "left-1");
        assert_eq!(graph.add_element(Side::Left), "left-3");
        assert_eq!(graph.add_element(Side::Right), "right-0");
    }

    #[test]
    fn two_clicks_draw_a_line() {
        let mut graph = graph_with(1, 1);
        assert_eq!(graph.toggle_endpoint(Side::Left, "left-0"), ToggleOutcome::Started);
        assert_eq!(
            graph.pending_endpoint,
            Some(Endpoint {
                side: Side::Left,
                id: "left-0".to_string()
            })
        );
        assert_eq!(
            graph.toggle_endpoint(Side::Right, "right-0"),
            ToggleOutcome::Completed(MatchPair::new("left-0", "right-0"))
        );
        assert_eq!(graph.pending_endpoint, None);
        assert_eq!(graph.completed_matches(), vec![MatchPair::new("left-0", "right-0")]);
    }

    #[test]
    fn lines_can_start_from_the_right() {
        let mut graph = graph_with(1, 1);
        graph.toggle_endpoint(Side::Right, "right-0");
        graph.toggle_endpoint(Side::Left, "left-0");
        assert_eq!(graph.completed_matches(), vec![MatchPair::new("left-0", "right-0")]);
    }

    #[test]
    fn same_side_click_moves_pending_endpoint() {
        let mut graph = graph_with(2, 1);
        graph.toggle_endpoint(Side::Left, "left-0");
        assert_eq!(graph.toggle_endpoint(Side::Left, "left-1"), ToggleOutcome::Moved);
        assert_eq!(graph.correct_matches.len(), 1);
        assert_eq!(graph.pending_endpoint.as_ref().map(|p| p.id.as_str()), Some("left-1"));

        graph.toggle_endpoint(Side::Right, "right-0");
        assert_eq!(graph.completed_matches(), vec![MatchPair::new("left-1", "right-0")]);
    }

    #[test]
    fn duplicate_pair_is_ignored() {
        let mut graph = graph_with(1, 1);
        connect(&mut graph, "left-0", "right-0");
        let outcome = connect(&mut graph, "left-0", "right-0");
        assert_eq!(outcome, ToggleOutcome::Duplicate(MatchPair::new("left-0", "right-0")));
        assert_eq!(graph.correct_matches.len(), 1);
        assert_eq!(graph.pending_endpoint, None);
    }

    #[test]
    fn many_to_many_lines_are_allowed() {
        let mut graph = graph_with(2, 2);
        connect(&mut graph, "left-0", "right-0");
        connect(&mut graph, "left-1", "right-0");
        connect(&mut graph, "left-0", "right-1");
        assert_eq!(graph.completed_matches().len(), 3);
    }

    #[test]
    fn remove_element_cascades_to_lines() {
        let mut graph = graph_with(2, 2);
        connect(&mut graph, "left-0", "right-0");
        connect(&mut graph, "left-1", "right-0");
        connect(&mut graph, "left-1", "right-1");

        graph.remove_element(Side::Right, "right-0");
        assert_eq!(graph.completed_matches(), vec![MatchPair::new("left-1", "right-1")]);
        assert_eq!(graph.right_side.len(), 1);
    }

    #[test]
    fn remove_element_clears_pending_endpoint() {
        let mut graph = graph_with(1, 1);
        graph.toggle_endpoint(Side::Left, "left-0");
        graph.remove_element(Side::Left, "left-0");
        assert_eq!(graph.pending_endpoint, None);
        assert!(graph.correct_matches.is_empty());
    }

    #[test]
    fn remove_match_removes_exact_pair() {
        let mut graph = graph_with(2, 1);
        connect(&mut graph, "left-0", "right-0");
        connect(&mut graph, "left-1", "right-0");
        assert!(graph.remove_match("left-0", "right-0"));
        assert!(!graph.remove_match("left-0", "right-0"));
        assert_eq!(graph.completed_matches(), vec![MatchPair::new("left-1", "right-0")]);
    }

    #[test]
    fn payload_drops_incomplete_line() {
        let mut graph = graph_with(2, 1);
        graph.set_text(Side::Left, "left-0", "Paris");
        connect(&mut graph, "left-0", "right-0");
        graph.toggle_endpoint(Side::Left, "left-1");

        let payload = graph.to_payload();
        assert_eq!(payload.correct_matches, vec![MatchPair::new("left-0", "right-0")]);
        assert_eq!(payload.left_side[0].text, "Paris");

        let restored = ExtendedMatchGraph::from_payload(&payload);
        assert_eq!(restored.completed_matches(), payload.correct_matches);
        assert_eq!(restored.pending_endpoint, None);
    }

    #[test]
    fn cancel_pending_drops_incomplete_line() {
        let mut graph = graph_with(1, 1);
        connect(&mut graph, "left-0", "right-0");
        graph.toggle_endpoint(Side::Right, "right-0");
        graph.cancel_pending();
        assert_eq!(graph.correct_matches.len(), 1);
        assert_eq!(graph.pending_endpoint, None);
    }
}
