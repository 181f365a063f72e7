//! Error taxonomy for quiz retrieval, play and score persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the quiz library
#[derive(Debug, Error)]
pub enum QuizError {
    /// Network failure talking to the quiz source
    #[error("request to quiz source failed: {0}")]
    Transport(String),

    /// Quiz source answered with a non-2xx status
    #[error("quiz source returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not a JSON array of questions
    #[error("malformed quiz data: {0}")]
    Malformed(String),

    /// A "true"/"false" flag on a question could not be parsed
    #[error("invalid boolean `{value}` for `{field}` on question {question_id}")]
    InvalidFlag {
        question_id: i64,
        field: String,
        value: String,
    },

    /// Question data violates the answer/correctness invariant
    #[error("question {question_id} is invalid: {reason}")]
    InvalidQuestion { question_id: i64, reason: String },

    #[error("quiz source returned no questions")]
    EmptyQuiz,

    /// Every batch fetched contained a question the policy rejects
    #[error("no acceptable quiz after {0} attempt(s)")]
    NoAcceptableQuiz(u32),

    #[error("failed to read score history {}: {source}", .path.display())]
    HistoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write score history {}: {source}", .path.display())]
    HistoryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input ended before the quiz was finished
    #[error("input closed before question {0} was answered")]
    InputClosed(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
