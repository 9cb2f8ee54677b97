//! Logging setup: presets selected by CLI switches, per-target overrides
//! via `--log target=level`, text or JSON output, `RUST_LOG` fallback.
//!
//! Logs go to stderr; stdout only carries assistant output.

use std::collections::HashMap;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(Self::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(format!("unknown log format {:?}, expected text or json", s))
        }
    }
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Warnings, plus session starts
    #[default]
    Production,
    /// Operational detail: setting changes, command runs
    Verbose,
    /// Classification, cache and store detail
    Debug,
    /// Everything, including HTTP client internals
    Trace,
    /// Errors only
    Quiet,
}

impl LogPreset {
    /// Pick the preset from CLI switches; the quietest switch wins.
    pub fn from_flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> Self {
        match (quiet, trace, debug, verbose) {
            (true, ..) => Self::Quiet,
            (_, true, ..) => Self::Trace,
            (_, _, true, _) => Self::Debug,
            (_, _, _, true) => Self::Verbose,
            _ => Self::Production,
        }
    }

    fn directives(self) -> &'static [&'static str] {
        match self {
            Self::Production => &["warn", "erenai=warn", "erenai::session=info"],
            Self::Verbose => &["warn", "erenai=info"],
            Self::Debug => &["warn", "erenai=debug"],
            Self::Trace => &["erenai=trace", "reqwest=debug"],
            Self::Quiet => &["error", "erenai=error"],
        }
    }
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target level overrides (e.g., "erenai::cache" -> DEBUG)
    pub overrides: HashMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: Vec<String>,
        format: LogFormat,
    ) -> Self {
        let overrides = log_overrides
            .iter()
            .flat_map(|arg| arg.split(','))
            .filter_map(parse_override)
            .collect();

        Self {
            preset: LogPreset::from_flags(verbose, debug, trace, quiet),
            overrides,
            format,
        }
    }

    /// RUST_LOG wins over presets and overrides when set.
    pub fn build_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(self.directives().join(","))
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        })
    }

    fn directives(&self) -> Vec<String> {
        let overrides = self
            .overrides
            .iter()
            .map(|(target, level)| format!("{}={}", target, level.as_str().to_lowercase()));

        self.preset
            .directives()
            .iter()
            .map(|d| d.to_string())
            .chain(overrides)
            .collect()
    }
}

/// Parse one `target=level` pair, qualifying bare targets with `erenai::`.
fn parse_override(pair: &str) -> Option<(String, Level)> {
    let (target, level) = pair.split_once('=')?;
    let target = target.trim();
    let level = match level.trim().to_lowercase().as_str() {
        "warning" => Level::WARN,
        other => other.parse().ok()?,
    };

    let target = if target == "erenai" || target.starts_with("erenai::") {
        target.to_string()
    } else {
        format!("erenai::{}", target)
    };
    Some((target, level))
}

/// Install the global subscriber. Output goes to stderr.
pub fn init(config: &LogConfig) {
    let registry = tracing_subscriber::registry().with(config.build_filter());

    match config.format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init(),
    }
}
