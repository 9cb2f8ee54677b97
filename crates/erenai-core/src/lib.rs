//! Request classification and conversation state for the ErenAI assistant.

pub mod cache;
pub mod context;
mod db;
mod dialogue;
mod error;
pub mod i18n;
pub mod intent;
mod language;
pub mod llm;
mod session;
pub mod shell;
pub mod suggest;

pub use db::Store;
pub use dialogue::{is_exit_keyword, AssistantConfig, Dialogue, Outcome};
pub use error::ErenaiError;
pub use i18n::{localize, Message};
pub use intent::classify;
pub use language::LanguageDetector;
pub use llm::{ModelClient, ModelConfig, ModelError, OpenAiClient};
pub use session::SessionTracker;
pub use shell::{ShellExecutor, ShellOutput, SystemShell};

/// Result type for ErenAI operations.
pub type Result<T> = std::result::Result<T, ErenaiError>;
