//! Per-line orchestration: classify, dispatch, log, respond.

use crate::context::{build_context, build_messages};
use crate::i18n::{localize, Message};
use crate::intent::classify;
use crate::llm::{ModelClient, ModelError};
use crate::shell::ShellExecutor;
use crate::{cache, suggest, LanguageDetector, Result, SessionTracker, Store};
use erenai_types::{
    CommandHistoryEntry, Intent, Interaction, InteractionSource, Locale, SettingValue, UserSettings,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Input lines that end an interactive session.
const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "çıkış", "kapat"];

/// Process-wide configuration of the assistant core.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub db_path: PathBuf,
    pub session_file: PathBuf,
    /// Fallback locale for language detection.
    pub default_locale: Locale,
    /// Values seeded into the settings table when a key is absent.
    pub default_settings: UserSettings,
    /// How many recent successful commands feed the suggestion ranker.
    pub max_command_history: u32,
}

impl AssistantConfig {
    /// Configuration storing everything under `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            db_path: data_dir.join("erenai.db"),
            session_file: data_dir.join("session.json"),
            default_locale: Locale::Tr,
            default_settings: UserSettings::default(),
            max_command_history: 50,
        }
    }
}

/// Result of processing one non-blank input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A setting was persisted; carries the confirmation.
    SettingChanged(String),
    /// The current settings, formatted.
    SettingsReport(String),
    /// A shell command ran; `output` is stdout or the annotated error.
    CommandRan {
        command: String,
        output: String,
        success: bool,
    },
    /// The model's answer, possibly served from the cache.
    Answer { text: String, cached: bool },
    /// The model could not be reached; carries the localized explanation.
    ModelFailed(String),
}

impl Outcome {
    /// Text presented to the user.
    pub fn text(&self) -> &str {
        match self {
            Self::SettingChanged(text) | Self::SettingsReport(text) | Self::ModelFailed(text) => text,
            Self::CommandRan { output, .. } => output,
            Self::Answer { text, .. } => text,
        }
    }
}

/// The dialogue loop and the state it threads through each cycle.
pub struct Dialogue<S, M> {
    store: Store,
    sessions: SessionTracker,
    detector: LanguageDetector,
    config: AssistantConfig,
    shell: S,
    model: M,
}

impl<S: ShellExecutor, M: ModelClient> Dialogue<S, M> {
    /// Open the store described by `config` and seed default settings.
    pub fn open(config: AssistantConfig, shell: S, model: M) -> Result<Self> {
        let store = Store::open(&config.db_path)?;
        Self::with_store(store, config, shell, model)
    }

    /// Build a dialogue over an already opened store.
    pub fn with_store(store: Store, config: AssistantConfig, shell: S, model: M) -> Result<Self> {
        store.seed_defaults(&config.default_settings)?;
        Ok(Self {
            store,
            sessions: SessionTracker::new(config.session_file.clone()),
            detector: LanguageDetector::new(config.default_locale),
            config,
            shell,
            model,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Current settings, read fresh from the store.
    pub fn settings(&self) -> Result<UserSettings> {
        self.store.user_settings(&self.config.default_settings)
    }

    /// Persist a setting outside of the classifier, e.g. from CLI flags.
    pub fn update_setting(&self, value: SettingValue) -> Result<()> {
        self.store.update_setting(value)
    }

    /// Ranked command suggestions, empty when disabled.
    pub fn suggestions(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let settings = self.settings()?;
        suggest::suggest(
            &self.store,
            &settings,
            self.config.max_command_history,
            prefix,
        )
    }

    /// Process one input line.
    ///
    /// Progress notices ("executing", "thinking") are written to `notices`
    /// as they happen; the final result is returned for the caller to
    /// present. Blank input yields `None`.
    pub fn process<W: Write>(&mut self, query: &str, notices: &mut W) -> Result<Option<Outcome>> {
        if query.trim().is_empty() {
            return Ok(None);
        }

        let settings = self.settings()?;
        let intent = classify(query);
        debug!(target: "erenai::dialogue", "Dispatching {:?}", intent.kind());

        let outcome = match intent {
            Intent::Setting(value) => self.apply_setting(value)?,
            Intent::SettingsQuery => Outcome::SettingsReport(localize(
                Message::SettingsReport(&settings),
                settings.language,
            )),
            Intent::ShellCommand(command) => self.run_command(query, command, &settings, notices)?,
            Intent::ModelQuery => self.answer(query, &settings, notices)?,
        };
        Ok(Some(outcome))
    }

    fn apply_setting(&self, value: SettingValue) -> Result<Outcome> {
        self.store.update_setting(value)?;
        let language = self.settings()?.language;

        let message = match value {
            SettingValue::Language(lang) => Message::LanguageSet(lang),
            SettingValue::ContextLength(n) => Message::ContextLengthSet(n),
            SettingValue::CommandSuggestions(on) => Message::CommandSuggestionsSet(on),
        };
        info!(
            target: "erenai::dialogue",
            "Setting {} changed to {}",
            value.key().as_str(),
            value.to_stored()
        );
        Ok(Outcome::SettingChanged(localize(message, language)))
    }

    fn run_command<W: Write>(
        &self,
        query: &str,
        command: String,
        settings: &UserSettings,
        notices: &mut W,
    ) -> Result<Outcome> {
        writeln!(
            notices,
            "{}",
            localize(Message::ExecutingCommand(&command), settings.language)
        )?;

        let result = self.shell.execute(&command);
        self.store
            .insert_command(&CommandHistoryEntry::new(command.as_str(), result.success))?;

        let output = if result.success {
            result.stdout
        } else if result.launched {
            localize(
                Message::CommandFailed(result.stderr.trim_end()),
                settings.language,
            )
        } else {
            localize(
                Message::CommandLaunchFailed(result.stderr.trim_end()),
                settings.language,
            )
        };

        self.log_interaction(query, &output, InteractionSource::SystemCommand)?;
        Ok(Outcome::CommandRan {
            command,
            output,
            success: result.success,
        })
    }

    fn answer<W: Write>(
        &self,
        query: &str,
        settings: &UserSettings,
        notices: &mut W,
    ) -> Result<Outcome> {
        if let Some(text) = cache::lookup(&self.store, query)? {
            return Ok(Outcome::Answer { text, cached: true });
        }

        if !self.model.has_credentials() {
            warn!(target: "erenai::model", "No API key configured, skipping model call");
            return Ok(Outcome::ModelFailed(localize(
                Message::MissingApiKey,
                settings.language,
            )));
        }

        writeln!(notices, "{}", localize(Message::Thinking, settings.language))?;

        let locale = self.detector.detect(query);
        let session_id = self.sessions.session_id()?;
        let context = build_context(&self.store, &session_id, settings.context_length)?;
        let messages = build_messages(&context, query);
        let system_prompt = localize(Message::SystemPrompt, locale);

        match self.model.complete(&system_prompt, &messages) {
            Ok(text) => {
                let interaction = Interaction::new(
                    query,
                    text.as_str(),
                    InteractionSource::ModelQuery,
                    session_id,
                    locale,
                );
                self.store.insert_interaction(&interaction)?;
                Ok(Outcome::Answer { text, cached: false })
            }
            // Failures are not logged, so they never become cache entries
            Err(e) => {
                warn!(target: "erenai::model", "Model call failed: {}", e);
                Ok(Outcome::ModelFailed(localize_model_error(&e, settings.language)))
            }
        }
    }

    fn log_interaction(&self, query: &str, response: &str, source: InteractionSource) -> Result<()> {
        let interaction = Interaction::new(
            query,
            response,
            source,
            self.sessions.session_id()?,
            self.detector.detect(query),
        );
        self.store.insert_interaction(&interaction)?;
        Ok(())
    }

    /// Process a single query and print its result.
    pub fn run_once<W: Write>(&mut self, query: &str, out: &mut W) -> Result<()> {
        if let Some(outcome) = self.process(query, out)? {
            render(&outcome, out)?;
        }
        Ok(())
    }

    /// Read and answer lines until an exit keyword or end of input.
    pub fn run_interactive<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", localize(Message::Greeting, self.settings()?.language))?;
        let mut lines = input.lines();

        loop {
            let settings = self.settings()?;
            self.print_suggestions(&settings, out)?;

            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;

            if is_exit_keyword(&line) {
                break;
            }

            if let Some(outcome) = self.process(&line, out)? {
                render(&outcome, out)?;
            }
        }

        writeln!(out, "{}", localize(Message::Farewell, self.settings()?.language))?;
        Ok(())
    }

    fn print_suggestions<W: Write>(&self, settings: &UserSettings, out: &mut W) -> Result<()> {
        let suggestions = suggest::suggest(
            &self.store,
            settings,
            self.config.max_command_history,
            None,
        )?;
        if suggestions.is_empty() {
            return Ok(());
        }

        writeln!(out, "\n{}", localize(Message::SuggestedCommands, settings.language))?;
        for (i, command) in suggestions.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, command)?;
        }
        writeln!(out)?;
        Ok(())
    }
}

fn render<W: Write>(outcome: &Outcome, out: &mut W) -> Result<()> {
    match outcome {
        Outcome::CommandRan { output, .. } => writeln!(out, "{}", output.trim_end())?,
        other => writeln!(out, "ErenAI: {}", other.text())?,
    }
    Ok(())
}

fn localize_model_error(error: &ModelError, locale: Locale) -> String {
    match error {
        ModelError::MissingApiKey => localize(Message::MissingApiKey, locale),
        ModelError::MalformedResponse(detail) => localize(Message::DecodeError(detail), locale),
        other => localize(Message::ApiError(&other.to_string()), locale),
    }
}

/// Whether `line` is one of the exit keywords, ignoring case and padding.
pub fn is_exit_keyword(line: &str) -> bool {
    let line = line.trim();
    let lower = line.to_lowercase();
    let upper = line.to_uppercase();
    EXIT_KEYWORDS
        .iter()
        .any(|keyword| *keyword == lower || keyword.to_uppercase() == upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_keywords() {
        assert!(is_exit_keyword("exit"));
        assert!(is_exit_keyword("  QUIT \n"));
        assert!(is_exit_keyword("çıkış"));
        assert!(is_exit_keyword("ÇIKIŞ"));
        assert!(is_exit_keyword("Kapat"));
        assert!(!is_exit_keyword("exit now"));
        assert!(!is_exit_keyword(""));
    }

    #[test]
    fn test_outcome_text() {
        let outcome = Outcome::CommandRan {
            command: "ls".into(),
            output: "a\nb\n".into(),
            success: true,
        };
        assert_eq!(outcome.text(), "a\nb\n");

        let mut rendered = Vec::new();
        render(&outcome, &mut rendered).unwrap();
        assert_eq!(String::from_utf8(rendered).unwrap(), "a\nb\n");

        let mut rendered = Vec::new();
        render(&Outcome::ModelFailed("boom".into()), &mut rendered).unwrap();
        assert_eq!(String::from_utf8(rendered).unwrap(), "ErenAI: boom\n");
    }
}
