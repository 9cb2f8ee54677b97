//! Interaction and command history records.
//!
//! Both record kinds are append-only: the store assigns the `id` on insert
//! and nothing in the core ever updates or deletes a written row.

use crate::Locale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Compute the content fingerprint of a raw query.
///
/// The fingerprint is an equality key for the response cache and for
/// grouping; it is case- and whitespace-sensitive and performs no
/// normalisation of its input.
pub fn fingerprint(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Which path produced an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionSource {
    /// A shell command was executed.
    SystemCommand,
    /// The remote model answered the query.
    ModelQuery,
}

impl InteractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemCommand => "system_command",
            Self::ModelQuery => "model_query",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system_command" => Some(Self::SystemCommand),
            "model_query" => Some(Self::ModelQuery),
            _ => None,
        }
    }
}

/// A completed query/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Monotonic row id (0 until stored).
    pub id: i64,
    /// Fingerprint of `query`, see [`fingerprint`].
    pub query_fingerprint: String,
    /// Raw query text as entered.
    pub query: String,
    /// Response text shown to the user.
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub source: InteractionSource,
    /// Session the interaction belongs to.
    pub session_id: String,
    /// Detected locale of the query.
    pub language: Locale,
}

impl Interaction {
    /// Build a new, not yet stored, interaction stamped with the current time.
    pub fn new(
        query: impl Into<String>,
        response: impl Into<String>,
        source: InteractionSource,
        session_id: impl Into<String>,
        language: Locale,
    ) -> Self {
        let query = query.into();
        Self {
            id: 0,
            query_fingerprint: fingerprint(&query),
            query,
            response: response.into(),
            timestamp: Utc::now(),
            source,
            session_id: session_id.into(),
            language,
        }
    }
}

/// One shell command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandHistoryEntry {
    pub id: i64,
    pub command: String,
    pub timestamp: DateTime<Utc>,
    /// Whether the command exited successfully.
    pub success: bool,
}

impl CommandHistoryEntry {
    pub fn new(command: impl Into<String>, success: bool) -> Self {
        Self {
            id: 0,
            command: command.into(),
            timestamp: Utc::now(),
            success,
        }
    }
}
