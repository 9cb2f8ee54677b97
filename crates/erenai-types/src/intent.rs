//! Classified purpose of one input line.

use crate::SettingValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Change a setting.
    Setting(SettingValue),
    /// Report the current settings.
    SettingsQuery,
    /// Run a literal shell command.
    ShellCommand(String),
    /// Ask the remote model.
    ModelQuery,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::Setting(_) => IntentKind::Setting,
            Self::SettingsQuery => IntentKind::SettingsQuery,
            Self::ShellCommand(_) => IntentKind::ShellCommand,
            Self::ModelQuery => IntentKind::ModelQuery,
        }
    }
}

/// Payload-free discriminant of [`Intent`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Setting,
    SettingsQuery,
    ShellCommand,
    ModelQuery,
}
