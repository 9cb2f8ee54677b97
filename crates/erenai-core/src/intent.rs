//! Rule-based classification of input lines.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//! setting directives, the settings query, direct shell commands,
//! natural-language run triggers, and finally the model query fallback.

use erenai_types::{Intent, Locale, SettingValue};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use tracing::trace;

/// A setting directive: a pattern and the value it produces.
struct SettingRule {
    pattern: Regex,
    /// Returns `None` when the capture cannot be turned into a value,
    /// in which case the rule does not match.
    extract: fn(&Captures<'_>) -> Option<SettingValue>,
}

impl SettingRule {
    fn new(pattern: &str, extract: fn(&Captures<'_>) -> Option<SettingValue>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid setting rule regex"),
            extract,
        }
    }
}

static SETTING_RULES: Lazy<Vec<SettingRule>> = Lazy::new(|| {
    vec![
        SettingRule::new(r"(?i)(dili?|language)[\s:]+(türkçe|turkish|tr)", |_| {
            Some(SettingValue::Language(Locale::Tr))
        }),
        SettingRule::new(r"(?i)(dili?|language)[\s:]+(ingilizce|english|en)", |_| {
            Some(SettingValue::Language(Locale::En))
        }),
        SettingRule::new(r"(?i)(bağlam uzunluğu|context length)[\s:]+(\d+)", |caps| {
            caps[2].parse().ok().map(SettingValue::ContextLength)
        }),
        SettingRule::new(
            r"(?i)(komut önerileri|command suggestions)[\s:]+(aç|on|1|true|yes|evet)",
            |_| Some(SettingValue::CommandSuggestions(true)),
        ),
        SettingRule::new(
            r"(?i)(komut önerileri|command suggestions)[\s:]+(kapa|off|0|false|no|hay[ıi]r)",
            |_| Some(SettingValue::CommandSuggestions(false)),
        ),
    ]
});

static SETTINGS_QUERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(ayarlar[ıi]?|settings)\s*(\?|nedir|göster|show|what are)",
        r"|^\s*(show|what are)\s+(the\s+)?(current\s+)?settings\s*\??\s*$",
    ))
    .expect("Invalid settings query regex")
});

/// First tokens that mark the whole input as a shell command.
const COMMAND_PREFIXES: &[&str] = &[
    "ssh", "scp", "restart", "reboot", "shutdown", "apt", "yum", "systemctl", "service", "start",
    "stop", "ls", "cd", "mkdir", "rm", "cp", "mv", "grep", "find", "cat", "ps", "top", "tail",
    "head", "sed", "awk", "ping", "ifconfig", "ip", "netstat", "wget", "curl", "docker", "kubectl",
];

/// "run: ..." style triggers, most specific phrase first.
static RUN_TRIGGERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(şu komutu çal[ıi]şt[ıi]r|run this command|execute this command)[\s:]+(.+)",
        r"(?i)\b(komutu çal[ıi]şt[ıi]r|run command|execute command)[\s:]+(.+)",
        r"(?i)\b(çal[ıi]şt[ıi]r|run|execute)[\s:]+(.+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("Invalid run trigger regex"))
    .collect()
});

/// Classify one line of input.
pub fn classify(query: &str) -> Intent {
    let intent = classify_inner(query);
    trace!(target: "erenai::intent", "Classified {:?} as {:?}", query, intent.kind());
    intent
}

fn classify_inner(query: &str) -> Intent {
    let folded = fold_dotted_capital_i(query);

    if let Some(value) = match_setting(&folded) {
        return Intent::Setting(value);
    }

    if SETTINGS_QUERY_RE.is_match(&folded) {
        return Intent::SettingsQuery;
    }

    if let Some(command) = match_direct_command(query) {
        return Intent::ShellCommand(command);
    }

    if let Some(command) = match_run_trigger(query) {
        return Intent::ShellCommand(command);
    }

    Intent::ModelQuery
}

/// Map Turkish `İ` to `i`, which `(?i)` case folding does not do.
/// Dotless `ı` is handled in the patterns with `[ıi]`.
fn fold_dotted_capital_i(query: &str) -> Cow<'_, str> {
    if query.contains('İ') {
        Cow::Owned(query.replace('İ', "i"))
    } else {
        Cow::Borrowed(query)
    }
}

fn match_setting(query: &str) -> Option<SettingValue> {
    SETTING_RULES.iter().find_map(|rule| {
        let caps = rule.pattern.captures(query)?;
        (rule.extract)(&caps)
    })
}

fn match_direct_command(query: &str) -> Option<String> {
    let lowered = query.to_lowercase();
    let first = lowered.split_whitespace().next()?;
    COMMAND_PREFIXES
        .contains(&first)
        .then(|| query.trim().to_string())
}

fn match_run_trigger(query: &str) -> Option<String> {
    RUN_TRIGGERS.iter().find_map(|re| {
        let command = re.captures(query)?.get(2)?.as_str().trim();
        (!command.is_empty()).then(|| command.to_string())
    })
}
