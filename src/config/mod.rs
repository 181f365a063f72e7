//! Configuration loading for Quizrank

mod schema;

pub use schema::{
    CliOverrides, Config, DEFAULT_ENDPOINT, DEFAULT_LIMIT, DEFAULT_MAX_FETCH_ATTEMPTS,
};

use crate::source::AcceptancePolicy;
use crate::Difficulty;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".quizrankrc.json";
pub const API_KEY_ENV: &str = "QUIZAPI_KEY";

/// Fully resolved settings handed to the quiz source and history store
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    pub endpoint: String,
    /// Empty when no key was configured anywhere
    pub api_key: String,
    pub limit: u32,
    pub history_file: PathBuf,
    pub max_fetch_attempts: u32,
    pub policy: AcceptancePolicy,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuizConfig {
    /// Apply defaults to whatever the config file, env and CLI left unset
    pub fn resolve(config: &Config, cwd: &Path) -> Self {
        let policy = if config.single_answer_only.unwrap_or(true) {
            AcceptancePolicy::SingleAnswerOnly
        } else {
            AcceptancePolicy::AnyQuestions
        };
        Self {
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key: config.api_key.clone().unwrap_or_default(),
            limit: config.limit.unwrap_or(DEFAULT_LIMIT).max(1),
            history_file: config.history_path(cwd),
            max_fetch_attempts: config
                .max_fetch_attempts
                .unwrap_or(DEFAULT_MAX_FETCH_ATTEMPTS)
                .max(1),
            policy,
            category: config.category.clone(),
            difficulty: config.difficulty,
        }
    }

    /// The API key, or an error explaining where to set one
    pub fn require_api_key(&self) -> Result<&str> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "No API key configured. Set {} or \"apiKey\" in {}, or pass --api-key",
                API_KEY_ENV,
                CONFIG_FILENAME
            );
        }
        Ok(&self.api_key)
    }
}

/// Find and load the config file. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

fn read_config(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;
    config.base_dir = config_path.parent().map(Path::to_path_buf);
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
}

/// Search for .quizrankrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Write a starter config into `dir` unless one exists. Returns the path if written.
pub fn write_default_config(dir: &Path, api_key: Option<&str>) -> Result<Option<PathBuf>> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        return Ok(None);
    }
    let config = Config {
        endpoint: Some(DEFAULT_ENDPOINT.to_string()),
        api_key: api_key.map(str::to_string),
        limit: Some(DEFAULT_LIMIT),
        history_file: Some(PathBuf::from(crate::history::DEFAULT_HISTORY_FILENAME)),
        max_fetch_attempts: Some(DEFAULT_MAX_FETCH_ATTEMPTS),
        single_answer_only: Some(true),
        ..Default::default()
    };
    let content = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        let resolved = QuizConfig::resolve(&config, dir.path());
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.limit, DEFAULT_LIMIT);
        assert_eq!(resolved.max_fetch_attempts, DEFAULT_MAX_FETCH_ATTEMPTS);
        assert_eq!(resolved.policy, AcceptancePolicy::SingleAnswerOnly);
        assert_eq!(resolved.history_file, dir.path().join("scores.txt"));
    }

    #[test]
    fn config_found_in_parent_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "limit": 4, "historyFile": "h.txt" }"#,
        )
        .unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();

        let config = load_config(&sub, None).unwrap();
        let resolved = QuizConfig::resolve(&config, &sub);
        assert_eq!(resolved.limit, 4);
        assert_eq!(resolved.history_file, dir.path().join("h.txt"));
    }

    #[test]
    fn explicit_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ limit: }").unwrap();
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn zero_limits_are_raised_to_one() {
        let config = Config {
            limit: Some(0),
            max_fetch_attempts: Some(0),
            ..Default::default()
        };
        let resolved = QuizConfig::resolve(&config, Path::new("/"));
        assert_eq!(resolved.limit, 1);
        assert_eq!(resolved.max_fetch_attempts, 1);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let resolved = QuizConfig::resolve(&Config::default(), Path::new("/"));
        let err = resolved.require_api_key().unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn default_config_round_trips_and_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let written = write_default_config(dir.path(), Some("abc")).unwrap();
        assert_eq!(written, Some(dir.path().join(CONFIG_FILENAME)));

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.single_answer_only, Some(true));

        assert_eq!(write_default_config(dir.path(), None).unwrap(), None);
    }
}
