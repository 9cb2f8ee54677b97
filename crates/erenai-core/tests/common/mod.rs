//! Common test utilities for dialogue integration tests.

#![allow(dead_code)]

use erenai_core::{
    AssistantConfig, Dialogue, ModelClient, ModelError, ShellExecutor, ShellOutput,
};
use erenai_types::{ChatMessage, Locale};
use std::cell::{Cell, RefCell};
use tempfile::TempDir;

/// Shell double that records commands and replays a fixed result.
#[derive(Default)]
pub struct FakeShell {
    pub commands: RefCell<Vec<String>>,
    pub result: ShellOutput,
}

impl FakeShell {
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            commands: RefCell::default(),
            result: ShellOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                success: true,
                launched: true,
            },
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            commands: RefCell::default(),
            result: ShellOutput {
                stdout: String::new(),
                stderr: stderr.to_string(),
                success: false,
                launched: true,
            },
        }
    }

    /// A shell whose process cannot be started.
    pub fn unlaunchable(error: &str) -> Self {
        Self {
            commands: RefCell::default(),
            result: ShellOutput::launch_failure(error),
        }
    }
}

impl ShellExecutor for FakeShell {
    fn execute(&self, command: &str) -> ShellOutput {
        self.commands.borrow_mut().push(command.to_string());
        self.result.clone()
    }
}

/// A recorded model call.
#[derive(Debug, Clone)]
pub struct ModelCall {
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
}

/// Model double answering "answer #N" and counting invocations.
pub struct FakeModel {
    pub credentials: bool,
    pub fail_with: Option<ModelError>,
    pub calls: RefCell<Vec<ModelCall>>,
    counter: Cell<usize>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self {
            credentials: true,
            fail_with: None,
            calls: RefCell::default(),
            counter: Cell::new(0),
        }
    }

    pub fn without_credentials() -> Self {
        Self {
            credentials: false,
            ..Self::new()
        }
    }

    pub fn failing(error: ModelError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> ModelCall {
        self.calls.borrow().last().cloned().expect("model was never called")
    }
}

impl ModelClient for FakeModel {
    fn has_credentials(&self) -> bool {
        self.credentials
    }

    fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String, ModelError> {
        self.calls.borrow_mut().push(ModelCall {
            system_prompt: system_prompt.to_string(),
            messages: messages.to_vec(),
        });
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        let n = self.counter.get() + 1;
        self.counter.set(n);
        Ok(format!("answer #{n}"))
    }
}

/// Open a dialogue in a fresh temporary data directory.
pub fn test_dialogue(
    shell: FakeShell,
    model: FakeModel,
) -> (Dialogue<FakeShell, FakeModel>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = AssistantConfig::in_dir(temp_dir.path());
    config.default_locale = Locale::En;
    config.default_settings.language = Locale::En;
    let dialogue = Dialogue::open(config, shell, model).unwrap();
    (dialogue, temp_dir)
}

/// Process `query`, discarding progress notices.
pub fn ask(dialogue: &mut Dialogue<FakeShell, FakeModel>, query: &str) -> erenai_core::Outcome {
    dialogue
        .process(query, &mut std::io::sink())
        .unwrap()
        .expect("query should not be blank")
}
