//! User settings persisted in the `user_settings` table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported human languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Turkish.
    Tr,
    /// English.
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language '{0}', expected 'tr' or 'en'")]
pub struct ParseLocaleError(pub String);

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tr" => Ok(Self::Tr),
            "en" => Ok(Self::En),
            other => Err(ParseLocaleError(other.to_string())),
        }
    }
}

/// Recognized setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Language,
    ContextLength,
    CommandSuggestions,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::Language,
        SettingKey::ContextLength,
        SettingKey::CommandSuggestions,
    ];

    /// Column value in `user_settings.key`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::ContextLength => "context_length",
            Self::CommandSuggestions => "command_suggestions",
        }
    }
}

/// A typed value for one recognized setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    Language(Locale),
    ContextLength(u32),
    CommandSuggestions(bool),
}

impl SettingValue {
    pub fn key(&self) -> SettingKey {
        match self {
            Self::Language(_) => SettingKey::Language,
            Self::ContextLength(_) => SettingKey::ContextLength,
            Self::CommandSuggestions(_) => SettingKey::CommandSuggestions,
        }
    }

    /// Textual form stored in the settings table.
    pub fn to_stored(&self) -> String {
        match self {
            Self::Language(locale) => locale.code().to_string(),
            Self::ContextLength(n) => n.to_string(),
            Self::CommandSuggestions(on) => if *on { "1" } else { "0" }.to_string(),
        }
    }

    /// Parse a stored textual value for `key`.
    pub fn from_stored(key: SettingKey, raw: &str) -> Option<Self> {
        match key {
            SettingKey::Language => raw.parse().ok().map(Self::Language),
            SettingKey::ContextLength => raw.trim().parse().ok().map(Self::ContextLength),
            SettingKey::CommandSuggestions => match raw.trim() {
                "1" => Some(Self::CommandSuggestions(true)),
                "0" => Some(Self::CommandSuggestions(false)),
                _ => None,
            },
        }
    }
}

/// Current values of all recognized settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub language: Locale,
    pub context_length: u32,
    pub command_suggestions: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Locale::Tr,
            context_length: 5,
            command_suggestions: true,
        }
    }
}

impl UserSettings {
    /// Stored form of every setting, in table order.
    pub fn values(&self) -> [SettingValue; 3] {
        [
            SettingValue::Language(self.language),
            SettingValue::ContextLength(self.context_length),
            SettingValue::CommandSuggestions(self.command_suggestions),
        ]
    }

    /// Overwrite the field addressed by `value`.
    pub fn apply(&mut self, value: SettingValue) {
        match value {
            SettingValue::Language(locale) => self.language = locale,
            SettingValue::ContextLength(n) => self.context_length = n,
            SettingValue::CommandSuggestions(on) => self.command_suggestions = on,
        }
    }
}
