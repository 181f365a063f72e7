//! Answer evaluation: parse a raw answer line and score it against a question

use crate::{Question, SlotLabel};
use serde::Serialize;
use std::collections::BTreeSet;

/// The labels a user selected for one question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    labels: BTreeSet<SlotLabel>,
}

impl UserResponse {
    /// Parse a comma-separated answer line such as `"B, a"`.
    ///
    /// Tokens are trimmed and lowercased, empty tokens are dropped and
    /// duplicates collapse. Unknown labels are kept so they count against
    /// the answer.
    pub fn parse(line: &str) -> Self {
        let labels = line
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(SlotLabel::new)
            .collect();
        Self { labels }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: labels.into_iter().map(|l| SlotLabel::new(l.as_ref())).collect(),
        }
    }

    pub fn labels(&self) -> &BTreeSet<SlotLabel> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Decide whether `response` answers `question` correctly.
///
/// A multi-answer question needs at least two selections. The selection
/// must have the same size as the correct set and equal it as a set.
pub fn evaluate(question: &Question, response: &UserResponse) -> bool {
    if question.multiple_correct_answers && response.len() < 2 {
        return false;
    }

    let correct = question.correct_labels();
    if response.len() != correct.len() {
        return false;
    }

    response.labels() == &correct
}
