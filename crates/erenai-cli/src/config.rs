//! Process-wide configuration.

use anyhow::Result;
use erenai_core::{AssistantConfig, ModelConfig};
use erenai_types::{Locale, UserSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Default locale, also the seeded `language` setting.
    #[serde(default = "default_language")]
    pub language: Locale,
    #[serde(default = "default_context_length")]
    pub context_length: u32,
    #[serde(default = "default_command_suggestions")]
    pub command_suggestions: bool,
    #[serde(default = "default_max_command_history")]
    pub max_command_history: u32,
    /// Only ever taken from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".erenai")
}

fn default_language() -> Locale {
    Locale::Tr
}

fn default_context_length() -> u32 {
    5
}

fn default_command_suggestions() -> bool {
    true
}

fn default_max_command_history() -> u32 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            data_dir: default_data_dir(),
            language: default_language(),
            context_length: default_context_length(),
            command_suggestions: default_command_suggestions(),
            max_command_history: default_max_command_history(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from the user config directory or fall back to defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Config::default())
    }

    /// Apply `OPENAI_API_KEY` and `ERENAI_LANG` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }

        if let Some(lang) = lookup("ERENAI_LANG") {
            match lang.parse() {
                Ok(locale) => self.language = locale,
                Err(e) => tracing::warn!(target: "erenai::startup", "Ignoring ERENAI_LANG: {}", e),
            }
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("erenai.db")
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Core configuration derived from this config.
    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            db_path: self.db_path(),
            session_file: self.session_file(),
            default_locale: self.language,
            default_settings: UserSettings {
                language: self.language,
                context_length: self.context_length,
                command_suggestions: self.command_suggestions,
            },
            max_command_history: self.max_command_history,
        }
    }

    /// Model client configuration derived from this config.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            api_url: self.api_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("erenai").join("config.toml"))
}
