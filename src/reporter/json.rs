//! JSON reporter for machine-readable output

use crate::ranking::Placement;
use crate::session::SessionOutcome;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished quiz, its placement and whether it was saved
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizReport<'a> {
    pub score: u32,
    pub total: usize,
    /// Percentile bucket, absent for the first recorded score
    pub percentile: Option<u32>,
    pub placement: &'a Placement,
    pub previous_score: Option<u32>,
    pub recorded: bool,
    pub questions: &'a [crate::session::QuestionOutcome],
    pub generated_at: String,
}

impl<'a> QuizReport<'a> {
    pub fn new(
        outcome: &'a SessionOutcome,
        placement: &'a Placement,
        previous_score: Option<u32>,
        recorded: bool,
    ) -> Self {
        Self {
            score: outcome.score,
            total: outcome.total,
            percentile: placement.percentile().map(|p| p.value()),
            placement,
            previous_score,
            recorded,
            questions: &outcome.questions,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
        }
    }

    /// Report a finished quiz as JSON
    pub fn report(&self, report: &QuizReport<'_>) -> String {
        self.render(report)
    }

    /// Report a bare placement (the `rank` command)
    pub fn report_placement(&self, placement: &Placement) -> String {
        self.render(placement)
    }
}
