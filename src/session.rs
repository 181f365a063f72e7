//! Interactive quiz session: one question at a time, one answer line each

use crate::evaluator::{evaluate, UserResponse};
use crate::reporter::ConsoleReporter;
use crate::{Question, Quiz, QuizError, Result, SlotLabel};
use serde::Serialize;
use std::io::{BufRead, Write};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// Index of the question waiting for an answer
    InProgress(usize),
    Completed,
}

/// Result of answering one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: i64,
    pub selected: Vec<SlotLabel>,
    pub correct_labels: Vec<SlotLabel>,
    pub correct: bool,
}

impl QuestionOutcome {
    pub fn new(question: &Question, response: &UserResponse) -> Self {
        Self {
            question_id: question.id,
            selected: response.labels().iter().cloned().collect(),
            correct_labels: question.correct_labels().into_iter().collect(),
            correct: evaluate(question, response),
        }
    }
}

/// Everything a completed session produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    /// Number of correctly answered questions
    pub score: u32,
    pub total: usize,
    pub questions: Vec<QuestionOutcome>,
}

/// Drives one quiz from the start gate to the final score
pub struct QuizSession<'a> {
    quiz: &'a Quiz,
    reporter: ConsoleReporter,
    pause: bool,
    state: SessionState,
    score: u32,
    outcomes: Vec<QuestionOutcome>,
}

impl<'a> QuizSession<'a> {
    pub fn new(quiz: &'a Quiz, reporter: ConsoleReporter) -> Self {
        Self {
            quiz,
            reporter,
            pause: true,
            state: SessionState::NotStarted,
            score: 0,
            outcomes: Vec::with_capacity(quiz.len()),
        }
    }

    /// Skip the "press enter" gate
    pub fn without_pause(mut self) -> Self {
        self.pause = false;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Correct answers so far
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Show the intro and wait for Enter, then move to the first question
    pub fn start<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<()> {
        if self.state != SessionState::NotStarted {
            return Ok(());
        }
        if self.pause {
            self.reporter.write_intro(out, self.quiz.len())?;
            if let Err(e) = read_answer_line(input, 1) {
                self.state = SessionState::Completed;
                return Err(e);
            }
        }
        self.state = if self.quiz.is_empty() {
            SessionState::Completed
        } else {
            SessionState::InProgress(0)
        };
        Ok(())
    }

    /// Ask the current question and score the answer.
    ///
    /// Returns the outcome, or None when there is nothing left to ask.
    /// Running out of input aborts the session.
    pub fn step<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Option<QuestionOutcome>> {
        let SessionState::InProgress(index) = self.state else {
            return Ok(None);
        };
        let quiz = self.quiz;
        let question = &quiz.questions()[index];

        self.reporter
            .write_question(out, index, quiz.len(), question)?;
        let line = match read_answer_line(input, index + 1) {
            Ok(line) => line,
            Err(e) => {
                self.state = SessionState::Completed;
                return Err(e);
            }
        };

        let response = UserResponse::parse(&line);
        let outcome = QuestionOutcome::new(question, &response);
        if outcome.correct {
            self.score += 1;
        }
        self.reporter.write_outcome(out, question, &outcome)?;
        self.outcomes.push(outcome.clone());

        self.state = if index + 1 < quiz.len() {
            SessionState::InProgress(index + 1)
        } else {
            SessionState::Completed
        };
        Ok(Some(outcome))
    }

    /// Run the whole session and return its outcome
    pub fn run<R: BufRead, W: Write>(mut self, input: &mut R, out: &mut W) -> Result<SessionOutcome> {
        self.start(input, out)?;
        while self.step(input, out)?.is_some() {}
        Ok(SessionOutcome {
            score: self.score,
            total: self.quiz.len(),
            questions: self.outcomes,
        })
    }
}

/// Read one line; end of input is an error naming the 1-based question
fn read_answer_line<R: BufRead>(input: &mut R, question_number: usize) -> Result<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        return Err(QuizError::InputClosed(question_number));
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn quiz() -> Quiz {
        Quiz::new(vec![
            Question::new(1, "First?", &[("a", "one"), ("b", "two")], &["a"], false).unwrap(),
            Question::new(2, "Second?", &[("a", "one"), ("b", "two"), ("c", "three")], &["c"], false)
                .unwrap(),
            Question::new(3, "Third?", &[("a", "x"), ("b", "y"), ("c", "z")], &["a", "c"], true)
                .unwrap(),
        ])
    }

    fn reporter() -> ConsoleReporter {
        ConsoleReporter::new().without_colors()
    }

    fn play(quiz: &Quiz, input: &str) -> (Result<SessionOutcome>, String) {
        let mut out: Vec<u8> = Vec::new();
        let result = QuizSession::new(quiz, reporter()).run(&mut Cursor::new(input), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn all_correct() {
        let quiz = quiz();
        let (result, output) = play(&quiz, "\na\nC\nc, a\n");
        let outcome = result.unwrap();
        assert_eq!(outcome.score, 3);
        assert_eq!(outcome.total, 3);
        assert!(outcome.questions.iter().all(|q| q.correct));
        assert!(output.contains("Press Enter to start"));
        assert!(output.contains("Question 3/3"));
    }

    #[test]
    fn score_counts_only_correct_answers() {
        let quiz = quiz();
        let (result, _) = play(&quiz, "\nb\nc\na\n");
        let outcome = result.unwrap();
        assert_eq!(outcome.score, 1);
        assert_eq!(
            outcome.questions.iter().map(|q| q.correct).collect::<Vec<_>>(),
            vec![false, true, false]
        );
    }

    #[test]
    fn empty_answer_lines_score_zero() {
        let quiz = quiz();
        let (result, _) = play(&quiz, "\n\n\n\n");
        assert_eq!(result.unwrap().score, 0);
    }

    #[test]
    fn input_closing_mid_quiz_aborts() {
        let quiz = quiz();
        let (result, _) = play(&quiz, "\na\n");
        assert!(matches!(result, Err(QuizError::InputClosed(2))));
    }

    #[test]
    fn input_closing_at_gate_aborts() {
        let quiz = quiz();
        let (result, _) = play(&quiz, "");
        assert!(matches!(result, Err(QuizError::InputClosed(1))));
    }

    #[test]
    fn without_pause_skips_gate() {
        let quiz = quiz();
        let mut out: Vec<u8> = Vec::new();
        let outcome = QuizSession::new(&quiz, reporter())
            .without_pause()
            .run(&mut Cursor::new("a\nc\na,c\n"), &mut out)
            .unwrap();
        assert_eq!(outcome.score, 3);
        assert!(!String::from_utf8(out).unwrap().contains("Press Enter"));
    }

    #[test]
    fn state_machine_transitions() {
        let quiz = quiz();
        let mut session = QuizSession::new(&quiz, reporter()).without_pause();
        let mut input = Cursor::new("a\nb\nx\n");
        let mut out: Vec<u8> = Vec::new();

        assert_eq!(session.state(), SessionState::NotStarted);
        session.start(&mut input, &mut out).unwrap();
        assert_eq!(session.state(), SessionState::InProgress(0));

        let first = session.step(&mut input, &mut out).unwrap().unwrap();
        assert!(first.correct);
        assert_eq!(session.state(), SessionState::InProgress(1));
        assert_eq!(session.score(), 1);

        session.step(&mut input, &mut out).unwrap();
        session.step(&mut input, &mut out).unwrap();
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.score(), 1);
        assert!(session.step(&mut input, &mut out).unwrap().is_none());
    }

    #[test]
    fn aborted_session_is_completed() {
        let quiz = quiz();
        let mut session = QuizSession::new(&quiz, reporter()).without_pause();
        let mut input = Cursor::new("");
        let mut out: Vec<u8> = Vec::new();
        session.start(&mut input, &mut out).unwrap();
        assert!(session.step(&mut input, &mut out).is_err());
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn empty_quiz_completes_immediately() {
        let quiz = Quiz::default();
        let mut out: Vec<u8> = Vec::new();
        let outcome = QuizSession::new(&quiz, reporter())
            .without_pause()
            .run(&mut Cursor::new(""), &mut out)
            .unwrap();
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total, 0);
    }

    #[test]
    fn outcome_records_selected_labels() {
        let quiz = quiz();
        let (result, _) = play(&quiz, "\nB, a\nc\na\n");
        let first = &result.unwrap().questions[0];
        assert_eq!(first.question_id, 1);
        assert_eq!(first.selected, vec![SlotLabel::new("a"), SlotLabel::new("b")]);
        assert_eq!(first.correct_labels, vec![SlotLabel::new("a")]);
        assert!(!first.correct);
    }
}
