//! Edge case tests: degenerate inputs must not panic.

use quizrank::evaluator::{evaluate, UserResponse};
use quizrank::history::{parse_scores, ScoreHistory};
use quizrank::ranking::{percentile, place, Placement};
use quizrank::{Question, Quiz, QuizError};
use std::io::Write;
use tempfile::NamedTempFile;

fn history_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn empty_history_file_ranks_as_first_score() {
    let file = history_file("");
    let history = ScoreHistory::load(file.path()).unwrap();
    assert!(history.is_empty());
    assert_eq!(place(3, history.scores()), Placement::FirstScore { score: 3 });
}

#[test]
fn whitespace_only_history_is_empty() {
    let file = history_file("  \n\t ");
    let history = ScoreHistory::load(file.path()).unwrap();
    assert!(history.is_empty());
    assert!(history.rejected().is_empty());
}

#[test]
fn history_of_only_garbage_has_no_scores() {
    let file = history_file("a,b,c");
    let history = ScoreHistory::load(file.path()).unwrap();
    assert!(history.is_empty());
    assert_eq!(history.rejected().len(), 3);
    assert_eq!(percentile(1, history.scores()), None);
}

#[test]
fn trailing_newline_in_history() {
    let (scores, rejected) = parse_scores("1,2,3\n");
    assert_eq!(scores, vec![1, 2, 3]);
    assert!(rejected.is_empty());
}

#[test]
fn huge_score_token_is_rejected_not_wrapped() {
    let (scores, rejected) = parse_scores("1,99999999999999999999");
    assert_eq!(scores, vec![1]);
    assert_eq!(rejected.len(), 1);
}

#[test]
fn score_of_zero_against_all_zero_history() {
    // pos 0 of 3 -> raw 33 -> 30 -> 35
    assert_eq!(percentile(0, &[0, 0, 0]).map(|p| p.value()), Some(35));
}

#[test]
fn empty_json_array_is_empty_quiz() {
    let quiz = Quiz::from_json("[]").unwrap();
    assert!(quiz.is_empty());
}

#[test]
fn truncated_json_is_malformed() {
    let err = Quiz::from_json("[{\"id\": 1,").unwrap_err();
    assert!(matches!(err, QuizError::Malformed(_)));
}

#[test]
fn answer_line_with_only_separators() {
    let q = Question::new(1, "?", &[("a", "x"), ("b", "y")], &["a"], false).unwrap();
    assert!(!evaluate(&q, &UserResponse::parse(",,,")));
}

#[test]
fn answer_line_with_windows_newline() {
    let q = Question::new(1, "?", &[("a", "x"), ("b", "y")], &["b"], false).unwrap();
    assert!(evaluate(&q, &UserResponse::parse("b\r\n")));
}
