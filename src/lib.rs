//! Quizrank: multiple-choice quizzes ranked against your own history
//!
//! This library fetches a batch of multiple-choice questions, runs an
//! interactive session over them, and places the final score as a
//! percentile against previously recorded scores.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod ranking;
pub mod reporter;
pub mod session;
pub mod source;

pub use error::{QuizError, Result};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Label of one answer option (`a`, `b`, `c`, ...)
///
/// Labels are stored trimmed and lowercased so that user input and
/// source data compare equal regardless of case or padding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotLabel(String);

impl SlotLabel {
    pub fn new(label: &str) -> Self {
        Self(label.trim().to_lowercase())
    }

    /// Label from a wire key such as `answer_b` or `answer_b_correct`
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        let stripped = key.strip_prefix("answer_").unwrap_or(key);
        let stripped = stripped.strip_suffix("_correct").unwrap_or(stripped);
        Self::new(stripped)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Question difficulty as reported by the quiz source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse case-insensitively; unknown values yield None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Value sent in the `difficulty` query parameter
    pub fn as_query(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_query())
    }
}

/// A boolean the source may send either as JSON bool or as "true"/"false"
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    fn parse(&self, question_id: i64, field: &str) -> Result<bool> {
        match self {
            FlagValue::Bool(b) => Ok(*b),
            FlagValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(QuizError::InvalidFlag {
                    question_id,
                    field: field.to_string(),
                    value: s.clone(),
                }),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TagRecord {
    pub name: String,
}

/// One question exactly as the quiz source sends it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub question: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, Option<String>>,
    pub multiple_correct_answers: FlagValue,
    #[serde(default)]
    pub correct_answers: BTreeMap<String, FlagValue>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagRecord>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// One validated multiple-choice question
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub prompt: String,
    pub description: Option<String>,
    answers: BTreeMap<SlotLabel, Option<String>>,
    /// Whether more than one answer may be correct
    pub multiple_correct_answers: bool,
    correct: BTreeMap<SlotLabel, bool>,
    pub explanation: Option<String>,
    pub tip: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl Question {
    /// Build a question from `(label, text)` options and the labels marked correct
    pub fn new(
        id: i64,
        prompt: &str,
        options: &[(&str, &str)],
        correct: &[&str],
        multiple_correct_answers: bool,
    ) -> Result<Self> {
        let answers = options
            .iter()
            .map(|(label, text)| (SlotLabel::new(label), Some(text.to_string())))
            .collect::<BTreeMap<_, _>>();
        let mut correct_map = answers
            .keys()
            .map(|label| (label.clone(), false))
            .collect::<BTreeMap<_, _>>();
        for label in correct {
            correct_map.insert(SlotLabel::new(label), true);
        }

        let question = Self {
            id,
            prompt: prompt.to_string(),
            description: None,
            answers,
            multiple_correct_answers,
            correct: correct_map,
            explanation: None,
            tip: None,
            tags: Vec::new(),
            category: None,
            difficulty: None,
        };
        question.validate()?;
        Ok(question)
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = Some(explanation.to_string());
        self
    }

    /// Non-empty answer options in label order
    pub fn options(&self) -> Vec<(&SlotLabel, &str)> {
        self.answers
            .iter()
            .filter_map(|(label, text)| match text.as_deref() {
                Some(t) if !t.trim().is_empty() => Some((label, t)),
                _ => None,
            })
            .collect()
    }

    /// Labels marked correct
    pub fn correct_labels(&self) -> BTreeSet<SlotLabel> {
        self.correct
            .iter()
            .filter(|(_, is_correct)| **is_correct)
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// True when the question is flagged multi-answer or marks several labels correct
    pub fn requires_multiple_answers(&self) -> bool {
        self.multiple_correct_answers || self.correct_labels().len() > 1
    }

    fn validate(&self) -> Result<()> {
        let correct = self.correct_labels();
        if correct.is_empty() {
            return Err(QuizError::InvalidQuestion {
                question_id: self.id,
                reason: "no answer is marked correct".to_string(),
            });
        }
        let offered: BTreeSet<&SlotLabel> = self.options().into_iter().map(|(l, _)| l).collect();
        if let Some(missing) = correct.iter().find(|l| !offered.contains(l)) {
            return Err(QuizError::InvalidQuestion {
                question_id: self.id,
                reason: format!("answer `{}` is marked correct but has no text", missing),
            });
        }
        Ok(())
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuizError;

    fn try_from(record: QuestionRecord) -> Result<Self> {
        let id = record.id;
        let multiple_correct_answers = record
            .multiple_correct_answers
            .parse(id, "multiple_correct_answers")?;

        let mut correct = BTreeMap::new();
        for (key, flag) in &record.correct_answers {
            correct.insert(SlotLabel::from_key(key), flag.parse(id, key)?);
        }

        let answers = record
            .answers
            .into_iter()
            .map(|(key, text)| (SlotLabel::from_key(&key), text))
            .collect();

        let difficulty = record.difficulty.as_deref().and_then(Difficulty::parse);

        let question = Self {
            id,
            prompt: record.question,
            description: record.description,
            answers,
            multiple_correct_answers,
            correct,
            explanation: record.explanation,
            tip: record.tip,
            tags: record.tags.into_iter().map(|t| t.name).collect(),
            category: record.category,
            difficulty,
        };
        question.validate()?;
        Ok(question)
    }
}

/// The ordered questions of one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quiz {
    questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Decode a JSON array of question records and validate every question
    pub fn from_json(body: &str) -> Result<Self> {
        let records: Vec<QuestionRecord> =
            serde_json::from_str(body).map_err(|e| QuizError::Malformed(e.to_string()))?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self> {
        let questions = records
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Whether any question needs more than one answer selected
    pub fn has_multi_answer_question(&self) -> bool {
        self.questions.iter().any(Question::requires_multiple_answers)
    }
}
