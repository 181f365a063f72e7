//! Score history - a comma-separated list of past scores in a plain text file
//!
//! The file is append-only from the tool's point of view: a save rewrites
//! the whole file as the previously loaded content plus `,<score>`.
//! Concurrent runs against the same file are not coordinated; the last
//! writer wins.

use crate::{QuizError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DELIMITER: char = ',';
pub const DEFAULT_HISTORY_FILENAME: &str = "scores.txt";

/// Scores loaded from a history file, in append order
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreHistory {
    path: PathBuf,
    raw: String,
    scores: Vec<u32>,
    rejected: Vec<String>,
}

impl ScoreHistory {
    /// Read and parse the history file. A missing or unreadable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| QuizError::HistoryUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let (scores, rejected) = parse_scores(&raw);
        log::debug!(
            "loaded {} score(s) from {} ({} rejected)",
            scores.len(),
            path.display(),
            rejected.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            raw,
            scores,
            rejected,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File content exactly as loaded
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed scores in append order
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Tokens that were not non-negative integers
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Scores sorted ascending
    pub fn ascending(&self) -> Vec<u32> {
        let mut sorted = self.scores.clone();
        sorted.sort_unstable();
        sorted
    }

    /// Most recently appended score
    pub fn last(&self) -> Option<u32> {
        self.scores.last().copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Append `score` to the file and to this in-memory view
    pub fn record(&mut self, score: u32) -> Result<()> {
        let content = save_history(&self.path, &self.raw, score)?;
        self.raw = content;
        self.scores.push(score);
        Ok(())
    }

    pub fn stats(&self) -> Option<HistoryStats> {
        HistoryStats::from_scores(&self.scores)
    }
}

/// Split `raw` on the delimiter and parse each trimmed token.
///
/// Empty tokens are skipped; tokens that are not non-negative integers are
/// returned separately and left out of the scores.
pub fn parse_scores(raw: &str) -> (Vec<u32>, Vec<String>) {
    let mut scores = Vec::new();
    let mut rejected = Vec::new();
    for token in raw.split(DELIMITER).map(str::trim) {
        if token.is_empty() {
            continue;
        }
        match token.parse::<u32>() {
            Ok(score) => scores.push(score),
            Err(_) => rejected.push(token.to_string()),
        }
    }
    (scores, rejected)
}

/// Content of the history file after appending `score` to `raw`
pub fn append_score(raw: &str, score: u32) -> String {
    if raw.trim().is_empty() {
        return score.to_string();
    }
    format!("{}{}{}", raw, DELIMITER, score)
}

/// Rewrite the history file as `raw` plus the new score. Returns the written content.
pub fn save_history(path: &Path, raw: &str, score: u32) -> Result<String> {
    let content = append_score(raw, score);
    fs::write(path, &content).map_err(|source| QuizError::HistoryWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("appended score {} to {}", score, path.display());
    Ok(content)
}

/// Create an empty history file unless one exists. Returns true if created.
pub fn create_empty(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, "")?;
    Ok(true)
}

/// Summary of a score history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub count: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub last: u32,
}

impl HistoryStats {
    pub fn from_scores(scores: &[u32]) -> Option<Self> {
        let last = *scores.last()?;
        let min = scores.iter().copied().min()?;
        let max = scores.iter().copied().max()?;
        let sum: u64 = scores.iter().map(|&s| s as u64).sum();
        Some(Self {
            count: scores.len(),
            min,
            max,
            mean: sum as f64 / scores.len() as f64,
            last,
        })
    }
}

/// Format delta for console: "[was 3, down 1]" or "[was 3, up 2]" or ""
pub fn format_delta(previous: Option<u32>, current: u32) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    if prev == current {
        return format!(" [unchanged at {}]", current);
    }
    if current > prev {
        format!(" [was {}, up {}]", prev, current - prev)
    } else {
        format!(" [was {}, down {}]", prev, prev - current)
    }
}
