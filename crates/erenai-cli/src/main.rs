//! ErenAI - terminal assistant that runs shell commands and answers questions.

use anyhow::{Context, Result};
use clap::Parser;
use erenai_cli::{config::Config, logging};
use erenai_core::{localize, Dialogue, Message, OpenAiClient, SystemShell};
use erenai_types::{Locale, SettingValue};
use std::io::{self, Write};
use std::path::PathBuf;

use logging::{LogConfig, LogFormat};

/// ErenAI - SSH-friendly AI assistant for the terminal.
#[derive(Parser, Debug)]
#[command(name = "erenai")]
#[command(about = "Terminal assistant: runs shell commands and answers questions")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Query to process; starts the interactive loop when omitted
    #[arg(value_name = "QUERY")]
    query: Vec<String>,

    /// Create the data directory, database and default settings, then exit
    #[arg(long)]
    setup: bool,

    /// Run the interactive loop
    #[arg(short, long)]
    interactive: bool,

    /// Persist the response language (tr or en)
    #[arg(short, long, value_name = "LANG")]
    language: Option<Locale>,

    /// Persist how many previous turns are sent as context
    #[arg(short, long = "context", value_name = "N")]
    context_length: Option<u32>,

    /// Turn command suggestions on
    #[arg(short, long, conflicts_with = "no_suggestions")]
    suggestions: bool,

    /// Turn command suggestions off
    #[arg(short, long)]
    no_suggestions: bool,

    /// Start a fresh conversation session
    #[arg(long)]
    new_session: bool,

    /// Print version information and exit
    #[arg(short = 'v', long)]
    version: bool,

    /// Path to config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (INFO level for erenai targets)
    #[arg(long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Enable trace logging (TRACE level for everything)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "cache=debug").
    /// Can be specified multiple times. Targets are prefixed with "erenai::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

impl Cli {
    /// Setting overrides requested on the command line, in a fixed order.
    fn setting_overrides(&self) -> Vec<SettingValue> {
        let mut values = Vec::new();
        if let Some(locale) = self.language {
            values.push(SettingValue::Language(locale));
        }
        if let Some(n) = self.context_length {
            values.push(SettingValue::ContextLength(n));
        }
        if self.suggestions {
            values.push(SettingValue::CommandSuggestions(true));
        } else if self.no_suggestions {
            values.push(SettingValue::CommandSuggestions(false));
        }
        values
    }

    fn wants_interactive(&self) -> bool {
        self.interactive || self.query.is_empty()
    }
}

fn version_banner() -> String {
    format!(
        "ErenAI v{} - SSH Tabanlı AI Asistanı\n(c) 2025 ErenAI Project - GPLv3 License",
        env!("CARGO_PKG_VERSION")
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_banner());
        return Ok(());
    }

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides.clone(),
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    config.apply_env();

    tracing::debug!(
        target: "erenai::startup",
        data_dir = %config.data_dir.display(),
        model = %config.model,
        "Configuration loaded"
    );

    let client = OpenAiClient::new(config.model_config())?;
    let mut dialogue = Dialogue::open(config.assistant_config(), SystemShell, client)
        .with_context(|| format!("failed to open database at {}", config.db_path().display()))?;

    if cli.setup {
        let language = dialogue.settings()?.language;
        println!("{}", localize(Message::SetupComplete, language));
        println!("{}", config.data_dir.display());
        return Ok(());
    }

    if cli.new_session && dialogue.sessions().rotate()? {
        tracing::info!(target: "erenai::session", "Session pointer removed on request");
    }

    for value in cli.setting_overrides() {
        dialogue.update_setting(value)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.wants_interactive() {
        let stdin = io::stdin();
        dialogue.run_interactive(stdin.lock(), &mut out)?;
    } else {
        dialogue.run_once(&cli.query.join(" "), &mut out)?;
    }
    out.flush()?;

    Ok(())
}
