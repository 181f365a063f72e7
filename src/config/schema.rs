//! Config schema and deserialization

use crate::Difficulty;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://quizapi.io/api/v1/questions";
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_MAX_FETCH_ATTEMPTS: u32 = 5;

/// Root config structure for .quizrankrc.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Question API endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key sent as the `apiKey` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Number of questions per quiz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Score history file, relative to the config file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,

    /// Upper bound on re-fetches when a batch is rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fetch_attempts: Option<u32>,

    /// Re-fetch batches that contain multi-answer questions (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_answer_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Values given on the command line; each one wins over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub limit: Option<u32>,
    pub history_file: Option<PathBuf>,
    pub max_fetch_attempts: Option<u32>,
    pub allow_multiple: bool,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli: &CliOverrides, cwd: &Path) -> Self {
        if cli.api_key.is_some() {
            self.api_key = cli.api_key.clone();
        }
        if cli.limit.is_some() {
            self.limit = cli.limit;
        }
        if let Some(ref path) = cli.history_file {
            // CLI paths are relative to where the user is, not to the config file
            self.history_file = Some(if path.is_absolute() {
                path.clone()
            } else {
                cwd.join(path)
            });
        }
        if cli.max_fetch_attempts.is_some() {
            self.max_fetch_attempts = cli.max_fetch_attempts;
        }
        if cli.allow_multiple {
            self.single_answer_only = Some(false);
        }
        if cli.category.is_some() {
            self.category = cli.category.clone();
        }
        if cli.difficulty.is_some() {
            self.difficulty = cli.difficulty;
        }
        self
    }

    /// Environment API key overrides the file; blank values are ignored
    pub fn merge_with_env(mut self, env_api_key: Option<String>) -> Self {
        if let Some(key) = env_api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// History file path, resolved against the config directory (or `cwd`)
    pub fn history_path(&self, cwd: &Path) -> PathBuf {
        let file = self
            .history_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::history::DEFAULT_HISTORY_FILENAME));
        if file.is_absolute() {
            return file;
        }
        match self.base_dir {
            Some(ref base) => base.join(file),
            None => cwd.join(file),
        }
    }
}
