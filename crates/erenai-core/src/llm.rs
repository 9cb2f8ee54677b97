//! Remote chat-completion client.
//!
//! The dialogue loop talks to the model through [`ModelClient`]; the
//! default implementation speaks the OpenAI chat completions protocol
//! over a blocking HTTP client.

use erenai_types::ChatMessage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Failures of a model call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A remote language model.
pub trait ModelClient {
    /// Whether a credential is available; checked before any call.
    fn has_credentials(&self) -> bool;

    /// Complete a chat given a system prompt and the ordered messages that
    /// follow it.
    fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String, ModelError>;
}

/// Settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<&'a ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiClient {
    config: ModelConfig,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

impl ModelClient for OpenAiClient {
    fn has_credentials(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ModelError::MissingApiKey)?;

        let system = ChatMessage::system(system_prompt);
        let body = ChatRequest {
            model: &self.config.model,
            messages: std::iter::once(&system).chain(messages.iter()).collect(),
            temperature: self.config.temperature,
        };

        debug!(
            target: "erenai::model",
            "POST {} ({} messages)",
            self.config.api_url,
            body.messages.len()
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(self.config.timeout_secs)
                } else {
                    ModelError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelError::MalformedResponse("no choices[0].message.content".into()))
    }
}
