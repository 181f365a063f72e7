//! Console reporter with colored output

use crate::history::{format_delta, HistoryStats};
use crate::ranking::Placement;
use crate::session::QuestionOutcome;
use crate::{Question, SlotLabel};
use colored::Colorize;
use std::io::{self, Write};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Show correct answers and explanations after each question
    reveal: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            reveal: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    pub fn reveal(mut self, reveal: bool) -> Self {
        self.reveal = reveal;
        self
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn verdict(&self, correct: bool) -> String {
        match (correct, self.use_colors) {
            (true, true) => "Correct".green().bold().to_string(),
            (false, true) => "Incorrect".red().bold().to_string(),
            (true, false) => "Correct".to_string(),
            (false, false) => "Incorrect".to_string(),
        }
    }

    /// Banner and the "press enter" gate text
    pub fn write_intro(&self, out: &mut dyn Write, total: usize) -> io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            self.bold(&format!("📝 Quiz: {} question(s)", total))
        )?;
        writeln!(
            out,
            "{}",
            self.dimmed("Answer with the option letter. Separate several letters with commas.")
        )?;
        write!(out, "Press Enter to start...")?;
        out.flush()
    }

    /// Prompt, description and lettered options of one question
    pub fn write_question(
        &self,
        out: &mut dyn Write,
        index: usize,
        total: usize,
        question: &Question,
    ) -> io::Result<()> {
        writeln!(out)?;
        let mut header = format!("Question {}/{}", index + 1, total);
        let mut meta = Vec::new();
        if let Some(ref category) = question.category {
            meta.push(category.clone());
        }
        if let Some(difficulty) = question.difficulty {
            meta.push(difficulty.to_string());
        }
        if !meta.is_empty() {
            header.push_str(&format!(" [{}]", meta.join(", ")));
        }
        writeln!(out, "{}", self.bold(&header))?;
        writeln!(out, "{}", question.prompt)?;
        if let Some(ref description) = question.description {
            if !description.trim().is_empty() {
                writeln!(out, "{}", self.dimmed(description))?;
            }
        }
        for (label, text) in question.options() {
            writeln!(out, "  {}) {}", label, text)?;
        }
        if question.multiple_correct_answers {
            writeln!(out, "{}", self.dimmed("(select every correct answer)"))?;
        }
        write!(out, "> ")?;
        out.flush()
    }

    /// Verdict for one answer, with the correct labels and explanation when revealing
    pub fn write_outcome(
        &self,
        out: &mut dyn Write,
        question: &Question,
        outcome: &QuestionOutcome,
    ) -> io::Result<()> {
        if !self.reveal {
            return Ok(());
        }
        write!(out, "{}", self.verdict(outcome.correct))?;
        if !outcome.correct {
            write!(out, " - answer: {}", join_labels(&outcome.correct_labels))?;
        }
        writeln!(out)?;
        if let Some(ref explanation) = question.explanation {
            if !explanation.trim().is_empty() {
                writeln!(out, "{}", self.dimmed(explanation))?;
            }
        }
        Ok(())
    }

    /// Final score, delta against the last run and percentile placement
    pub fn write_summary(
        &self,
        out: &mut dyn Write,
        placement: &Placement,
        total: usize,
        previous: Option<u32>,
    ) -> io::Result<()> {
        let score = placement.score();
        writeln!(out)?;
        writeln!(
            out,
            "{}{}",
            self.bold(&format!("Score: {}/{}", score, total)),
            format_delta(previous, score)
        )?;
        match placement {
            Placement::FirstScore { .. } => {
                writeln!(out, "First recorded score - no history to rank against yet.")?;
            }
            Placement::Ranked {
                percentile,
                compared_to,
                ..
            } => {
                let line = format!(
                    "Percentile: {} (against {} previous score(s))",
                    percentile, compared_to
                );
                if self.use_colors {
                    let colored = if percentile.value() >= 75 {
                        line.green()
                    } else if percentile.value() >= 40 {
                        line.yellow()
                    } else {
                        line.red()
                    };
                    writeln!(out, "{}", colored)?;
                } else {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        Ok(())
    }

    /// Summary of the history file for the `history` command
    pub fn write_history(&self, out: &mut dyn Write, stats: Option<&HistoryStats>) -> io::Result<()> {
        let Some(stats) = stats else {
            return writeln!(out, "No scores recorded yet.");
        };
        writeln!(out, "{}", self.bold("Score history"))?;
        writeln!(out, "  runs:  {}", stats.count)?;
        writeln!(out, "  best:  {}", stats.max)?;
        writeln!(out, "  worst: {}", stats.min)?;
        writeln!(out, "  mean:  {:.2}", stats.mean)?;
        writeln!(out, "  last:  {}", stats.last)
    }
}

fn join_labels(labels: &[SlotLabel]) -> String {
    labels
        .iter()
        .map(SlotLabel::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
