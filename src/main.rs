//! Quizrank: multiple-choice quiz CLI with percentile ranking

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use quizrank::config::{load_config, write_default_config, CliOverrides, QuizConfig, API_KEY_ENV};
use quizrank::history::{create_empty, ScoreHistory, DEFAULT_HISTORY_FILENAME};
use quizrank::ranking::{place, Placement};
use quizrank::reporter::{ConsoleReporter, JsonReporter, QuizReport};
use quizrank::session::QuizSession;
use quizrank::source::{fetch_acceptable, FileQuizSource, HttpQuizSource, QuizSource};
use quizrank::Difficulty;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Quizrank: take a multiple-choice quiz and see where you rank against your past scores
#[derive(Parser, Debug)]
#[command(name = "quizrank")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file (default: search .quizrankrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Score history file (default: scores.txt next to the config file)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Read questions from a local JSON file instead of the quiz API
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// API key for the quiz source (overrides QUIZAPI_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Number of questions to request
    #[arg(long, short)]
    limit: Option<u32>,

    /// Only ask questions from this category
    #[arg(long)]
    category: Option<String>,

    /// Only ask questions of this difficulty
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Maximum number of batches to request while looking for single-answer questions
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,

    /// Accept questions with several correct answers
    #[arg(long)]
    allow_multiple: bool,

    /// Show the correct answer and explanation after each question
    #[arg(long)]
    reveal: bool,

    /// Start immediately instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Do not append the score to the history file
    #[arg(long)]
    no_save: bool,

    /// Print the result as JSON (questions are shown on stderr)
    #[arg(long, short)]
    json: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the percentile a score would get, without recording it
    Rank {
        /// Score to rank
        score: u32,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long, short)]
        json: bool,
    },

    /// Summarize the recorded scores
    History {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long, short)]
        json: bool,
    },

    /// Create .quizrankrc.json and an empty score history
    Init {
        /// API key to store in the config
        #[arg(long)]
        api_key: Option<String>,

        /// Directory in which to create the files (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut args = Args::parse();
    init_logger(args.verbose);

    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;

    if let Some(cmd) = args.command.take() {
        return match cmd {
            Commands::Rank {
                score,
                config,
                history,
                json,
            } => run_rank(&cwd, score, config.as_deref(), history, json),
            Commands::History {
                config,
                history,
                json,
            } => run_history(&cwd, config.as_deref(), history, json),
            Commands::Init { api_key, dir } => run_init(&cwd, api_key.as_deref(), dir.as_deref()),
        };
    }

    run_quiz(&args, &cwd)
}

fn init_logger(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
}

fn parse_difficulty(value: &str) -> std::result::Result<Difficulty, String> {
    Difficulty::parse(value)
        .ok_or_else(|| format!("unknown difficulty `{}` (expected easy, medium or hard)", value))
}

/// Append the score unless saving is off. A failed write is a warning, not an error.
fn record_score(
    history: &mut ScoreHistory,
    score: u32,
    save: bool,
    warn: &mut dyn Write,
) -> io::Result<bool> {
    if !save {
        return Ok(false);
    }
    match history.record(score) {
        Ok(()) => Ok(true),
        Err(e) => {
            writeln!(warn, "{}: Score not saved: {}", "Warning".yellow(), e)?;
            Ok(false)
        }
    }
}

/// Resolve config file + environment + CLI flags into one QuizConfig
fn resolve_config(cwd: &Path, config_path: Option<&Path>, cli: &CliOverrides) -> Result<QuizConfig> {
    let config = load_config(cwd, config_path)?
        .merge_with_env(std::env::var(API_KEY_ENV).ok())
        .merge_with_cli(cli, cwd);
    Ok(QuizConfig::resolve(&config, cwd))
}

/// Load the history file, warning about tokens that were skipped
fn load_history(path: &Path) -> Result<ScoreHistory> {
    let history = ScoreHistory::load(path).context(
        "Score history is required (create one with `quizrank init` or point --history at an existing file)",
    )?;
    for token in history.rejected() {
        eprintln!(
            "{}: Ignoring unparsable score `{}` in {}",
            "Warning".yellow(),
            token,
            path.display()
        );
    }
    Ok(history)
}

fn run_quiz(args: &Args, cwd: &Path) -> Result<ExitCode> {
    let cli = CliOverrides {
        api_key: args.api_key.clone(),
        limit: args.limit,
        history_file: args.history.clone(),
        max_fetch_attempts: args.max_attempts,
        allow_multiple: args.allow_multiple,
        category: args.category.clone(),
        difficulty: args.difficulty,
    };
    let config = resolve_config(cwd, args.config.as_deref(), &cli)?;

    // Fail on a missing history before spending a request on questions
    let mut history = load_history(&config.history_file)?;

    let source: Box<dyn QuizSource> = match args.file {
        Some(ref path) => Box::new(FileQuizSource::new(&cwd.join(path))),
        None => {
            config.require_api_key()?;
            Box::new(HttpQuizSource::from_config(&config))
        }
    };
    let quiz = fetch_acceptable(source.as_ref(), config.policy, config.max_fetch_attempts)
        .context("Failed to get quiz questions")?;

    let reporter = ConsoleReporter::new().reveal(args.reveal);
    let mut session = QuizSession::new(&quiz, reporter);
    if args.no_pause {
        session = session.without_pause();
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out: Box<dyn Write> = if args.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let outcome = session.run(&mut input, &mut out)?;

    let previous = history.last();
    let placement = place(outcome.score, history.scores());

    let recorded = record_score(&mut history, outcome.score, !args.no_save, &mut io::stderr())?;

    if args.json {
        let report = QuizReport::new(&outcome, &placement, previous, recorded);
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else {
        let mut stdout = io::stdout();
        ConsoleReporter::new().write_summary(&mut stdout, &placement, outcome.total, previous)?;
        if recorded && args.verbose {
            eprintln!(
                "{}: Score saved to {}",
                "Info".blue(),
                history.path().display()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_rank(
    cwd: &Path,
    score: u32,
    config_path: Option<&Path>,
    history_path: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let cli = CliOverrides {
        history_file: history_path,
        ..Default::default()
    };
    let config = resolve_config(cwd, config_path, &cli)?;
    let history = load_history(&config.history_file)?;
    let placement = place(score, history.scores());

    if json {
        println!("{}", JsonReporter::new().pretty().report_placement(&placement));
        return Ok(ExitCode::SUCCESS);
    }

    match placement {
        Placement::FirstScore { score } => {
            println!("Score {}: no recorded scores to rank against", score);
        }
        Placement::Ranked {
            score,
            percentile,
            compared_to,
        } => {
            println!(
                "Score {}: {} percentile (against {} previous score(s))",
                score,
                percentile.to_string().bold(),
                compared_to
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_history(
    cwd: &Path,
    config_path: Option<&Path>,
    history_path: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let cli = CliOverrides {
        history_file: history_path,
        ..Default::default()
    };
    let config = resolve_config(cwd, config_path, &cli)?;
    let history = load_history(&config.history_file)?;
    let stats = history.stats();

    if json {
        let content =
            serde_json::to_string_pretty(&stats).context("Failed to serialize history stats")?;
        println!("{}", content);
    } else {
        ConsoleReporter::new().write_history(&mut io::stdout(), stats.as_ref())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(cwd: &Path, api_key: Option<&str>, dir: Option<&Path>) -> Result<ExitCode> {
    let dir = match dir {
        Some(d) if d.is_absolute() => d.to_path_buf(),
        Some(d) => cwd.join(d),
        None => cwd.to_path_buf(),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    match write_default_config(&dir, api_key)? {
        Some(path) => println!("{} {}", "Created".green(), path.display()),
        None => eprintln!(
            "{}: Config already exists in {}, left unchanged",
            "Info".blue(),
            dir.display()
        ),
    }

    let history_path = dir.join(DEFAULT_HISTORY_FILENAME);
    let created = create_empty(&history_path)
        .with_context(|| format!("Failed to create {}", history_path.display()))?;
    if created {
        println!("{} {}", "Created".green(), history_path.display());
    } else {
        eprintln!(
            "{}: {} already exists, left unchanged",
            "Info".blue(),
            history_path.display()
        );
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrank::session::SessionOutcome;
    use std::fs;

    fn loaded_history(content: &str) -> (tempfile::TempDir, ScoreHistory) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, content).unwrap();
        let history = ScoreHistory::load(&path).unwrap();
        (dir, history)
    }

    #[test]
    fn record_score_appends_to_history() {
        let (_dir, mut history) = loaded_history("4,1");
        let mut warn: Vec<u8> = Vec::new();
        assert!(record_score(&mut history, 3, true, &mut warn).unwrap());
        assert!(warn.is_empty());
        assert_eq!(fs::read_to_string(history.path()).unwrap(), "4,1,3");
    }

    #[test]
    fn record_score_skipped_when_saving_is_off() {
        let (_dir, mut history) = loaded_history("4,1");
        let mut warn: Vec<u8> = Vec::new();
        assert!(!record_score(&mut history, 3, false, &mut warn).unwrap());
        assert_eq!(fs::read_to_string(history.path()).unwrap(), "4,1");
    }

    #[test]
    fn failed_write_warns_and_still_reports() {
        let (_dir, mut history) = loaded_history("2");
        // Replace the file with a directory so the rewrite fails
        fs::remove_file(history.path()).unwrap();
        fs::create_dir(history.path()).unwrap();

        let mut warn: Vec<u8> = Vec::new();
        let previous = history.last();
        let placement = place(1, history.scores());
        let recorded = record_score(&mut history, 1, true, &mut warn).unwrap();

        assert!(!recorded);
        assert!(String::from_utf8(warn).unwrap().contains("Score not saved"));
        assert_eq!(history.scores(), &[2]);

        let outcome = SessionOutcome {
            score: 1,
            total: 3,
            questions: Vec::new(),
        };
        let report = QuizReport::new(&outcome, &placement, previous, recorded);
        let json: serde_json::Value =
            serde_json::from_str(&JsonReporter::new().report(&report)).unwrap();
        assert_eq!(json["recorded"], false);
        assert_eq!(json["score"], 1);
        assert_eq!(json["percentile"], 100);
    }

    #[test]
    fn difficulty_flag_is_case_insensitive() {
        assert_eq!(parse_difficulty("HARD"), Ok(Difficulty::Hard));
        assert!(parse_difficulty("extreme").is_err());
    }
}
