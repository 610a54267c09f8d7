use crate::constants;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
    #[serde(default = "default_example_char_limit")]
    pub example_char_limit: usize,
    #[serde(default = "default_min_keywords")]
    pub min_keywords: usize,
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_gemini_url() -> String {
    constants::DEFAULT_GEMINI_URL.to_string()
}

fn default_model() -> String {
    constants::DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_max_examples() -> usize {
    constants::DEFAULT_MAX_EXAMPLES
}

fn default_example_char_limit() -> usize {
    constants::EXAMPLE_CHAR_LIMIT
}

fn default_min_keywords() -> usize {
    constants::MIN_KEYWORDS
}

fn default_max_keywords() -> usize {
    constants::MAX_KEYWORDS
}

fn default_concurrency() -> usize {
    constants::DEFAULT_BATCH_CONCURRENCY
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            url: default_gemini_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_examples: default_max_examples(),
            example_char_limit: default_example_char_limit(),
            min_keywords: default_min_keywords(),
            max_keywords: default_max_keywords(),
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        for raw in constants::CONFIG_SEARCH_PATHS {
            let path = PathBuf::from(shellexpand::tilde(raw).into_owned());
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path when given, otherwise search the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let expanded = shellexpand::tilde(&p.to_string_lossy()).into_owned();
                Self::from_file(expanded)
            }
            None => Self::load(),
        }
    }

    /// Get the Gemini API key from config or environment variable
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    fn api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.gemini
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                constants::API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|name| lookup(name))
                    .find(|k| !k.trim().is_empty())
            })
    }
}
