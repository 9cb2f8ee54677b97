//! Command suggestions ranked by frequency.

use crate::{Result, Store};
use erenai_types::UserSettings;
use std::collections::HashMap;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Suggest up to [`MAX_SUGGESTIONS`] commands from recent successful history.
///
/// Considers the `max_history` most recent successful commands, ranks them
/// by descending frequency with ties going to the most recently used, and
/// only then applies the optional `prefix` filter, so fewer than five may
/// remain. Returns nothing when suggestions are disabled.
pub fn suggest(
    store: &Store,
    settings: &UserSettings,
    max_history: u32,
    prefix: Option<&str>,
) -> Result<Vec<String>> {
    if !settings.command_suggestions {
        return Ok(Vec::new());
    }

    let recent = store.recent_successful_commands(max_history)?;
    Ok(rank(recent, prefix))
}

/// Rank `commands` (newest first) by frequency.
fn rank(commands: Vec<String>, prefix: Option<&str>) -> Vec<String> {
    // (count, position of most recent use)
    let mut stats: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, command) in commands.into_iter().enumerate() {
        stats.entry(command).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = stats
        .into_iter()
        .map(|(command, (count, first_seen))| (command, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(command, _, _)| command)
        .filter(|command| prefix.is_none_or(|p| command.starts_with(p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use erenai_types::CommandHistoryEntry;
    use tempfile::TempDir;

    fn owned(commands: &[&str]) -> Vec<String> {
        commands.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_rank_by_frequency_then_recency() {
        // newest first
        let history = owned(&["ls", "df -h", "ls", "uptime", "df -h", "ls", "free"]);
        assert_eq!(rank(history, None), owned(&["ls", "df -h", "uptime", "free"]));
    }

    #[test]
    fn test_rank_truncates_before_filtering() {
        let history = owned(&["a1", "a1", "b", "b", "c", "d", "e", "a2"]);
        // Top five are a1, b, c, d, e; a2 falls off before the filter runs
        assert_eq!(rank(history, Some("a")), owned(&["a1"]));
    }

    #[test]
    fn test_suggest_respects_setting_and_failures() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("erenai.db")).unwrap();
        store.insert_command(&CommandHistoryEntry::new("ls", true)).unwrap();
        store.insert_command(&CommandHistoryEntry::new("badcmd", false)).unwrap();
        store.insert_command(&CommandHistoryEntry::new("ls", true)).unwrap();

        let mut settings = UserSettings::default();
        assert_eq!(suggest(&store, &settings, 50, None).unwrap(), owned(&["ls"]));

        settings.command_suggestions = false;
        assert!(suggest(&store, &settings, 50, None).unwrap().is_empty());
    }

    #[test]
    fn test_history_window_limits_candidates() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("erenai.db")).unwrap();
        for command in ["old", "old", "old", "new"] {
            store.insert_command(&CommandHistoryEntry::new(command, true)).unwrap();
        }

        let settings = UserSettings::default();
        assert_eq!(suggest(&store, &settings, 1, None).unwrap(), owned(&["new"]));
    }
}
