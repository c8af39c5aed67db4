use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::paper::DedupKey;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config has no keywords to track")]
    NoKeywords,
}

/// Tracker configuration, loaded from a JSON file.
///
/// The DeepSeek API key is deliberately not part of the file; it comes from
/// the `DEEPSEEK_API_KEY` environment variable at client construction.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Search terms, one independent tracking pipeline each.
    pub keywords: Vec<String>,
    /// Newest papers fetched per keyword per run.
    #[serde(default = "default_fetch_num")]
    pub fetch_num: u32,
    /// Model identifier sent to the chat API.
    #[serde(default = "default_model")]
    pub model: String,
    /// Chat API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identity field for deduplication. `authors` reproduces the legacy
    /// tracker's keying, which collides on repeat author sets.
    #[serde(default)]
    pub dedup_key: DedupKey,
    /// Directory holding the per-keyword corpus and report files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_fetch_num() -> u32 {
    100
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if config.keywords.is_empty() {
            return Err(ConfigError::NoKeywords);
        }
        Ok(config)
    }
}
