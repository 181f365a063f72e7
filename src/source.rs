//! Quiz sources: the remote question API and local JSON files
//!
//! The remote source returns a JSON array of questions for an HTTP GET with
//! `apiKey` and `limit` query parameters. Batches can be screened by an
//! [`AcceptancePolicy`]; rejected batches are re-requested a bounded number
//! of times.

use crate::config::QuizConfig;
use crate::{Difficulty, Quiz, QuizError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that can produce one batch of questions
pub trait QuizSource {
    fn fetch(&self) -> Result<Quiz>;
}

/// Blocking HTTP client for the remote question API
pub struct HttpQuizSource {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    limit: u32,
    category: Option<String>,
    difficulty: Option<Difficulty>,
}

impl HttpQuizSource {
    pub fn new(endpoint: &str, api_key: &str, limit: u32) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            limit,
            category: None,
            difficulty: None,
        }
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        let mut source = Self::new(&config.endpoint, &config.api_key, config.limit);
        source.category = config.category.clone();
        source.difficulty = config.difficulty;
        source
    }

    /// Restrict questions to one category
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("apiKey", self.api_key.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(ref category) = self.category {
            query.push(("category", category.clone()));
        }
        if let Some(difficulty) = self.difficulty {
            query.push(("difficulty", difficulty.as_query().to_string()));
        }
        query
    }

    /// Build the GET request without sending it
    pub fn request(&self) -> Result<reqwest::blocking::Request> {
        self.client
            .get(&self.endpoint)
            .query(&self.query())
            .build()
            .map_err(transport)
    }
}

/// The request URL carries the API key, so it is stripped from the message
fn transport(e: reqwest::Error) -> QuizError {
    QuizError::Transport(e.without_url().to_string())
}

impl QuizSource for HttpQuizSource {
    fn fetch(&self) -> Result<Quiz> {
        let request = self.request()?;
        log::debug!("GET {}", self.endpoint);

        let response = self
            .client
            .execute(request)
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuizError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(transport)?;
        Quiz::from_json(&body)
    }
}

/// Questions read from a local JSON file in the remote source's format
pub struct FileQuizSource {
    path: PathBuf,
}

impl FileQuizSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl QuizSource for FileQuizSource {
    fn fetch(&self) -> Result<Quiz> {
        let body = fs::read_to_string(&self.path)?;
        Quiz::from_json(&body)
    }
}

/// Which fetched batches are good enough to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptancePolicy {
    AnyQuestions,
    /// Reject batches containing a question that needs several answers
    SingleAnswerOnly,
}

impl AcceptancePolicy {
    pub fn accepts(self, quiz: &Quiz) -> bool {
        match self {
            AcceptancePolicy::AnyQuestions => true,
            AcceptancePolicy::SingleAnswerOnly => !quiz.has_multi_answer_question(),
        }
    }
}

/// Fetch until `policy` accepts a batch, at most `max_attempts` times.
///
/// Fetch errors are returned immediately; only policy rejections are retried.
pub fn fetch_acceptable(
    source: &dyn QuizSource,
    policy: AcceptancePolicy,
    max_attempts: u32,
) -> Result<Quiz> {
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let quiz = source.fetch()?;
        if quiz.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        if policy.accepts(&quiz) {
            log::info!("accepted quiz of {} question(s) on attempt {}", quiz.len(), attempt);
            return Ok(quiz);
        }
        log::debug!(
            "attempt {}/{}: batch has a multi-answer question, fetching again",
            attempt,
            max_attempts
        );
    }
    Err(QuizError::NoAcceptableQuiz(max_attempts))
}
