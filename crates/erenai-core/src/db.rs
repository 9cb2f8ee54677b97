//! SQLite persistence for interactions, command history, and user settings.

use crate::{ErenaiError, Result};
use chrono::{DateTime, Utc};
use erenai_types::{
    CommandHistoryEntry, Interaction, InteractionSource, Locale, SettingKey, SettingValue,
    UserSettings,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, warn};

/// SQLite-backed store owning every persisted record.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        debug!(target: "erenai::store", "Opened database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Wrap an existing connection, creating the schema if needed.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS interactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query_hash TEXT NOT NULL,
                query TEXT NOT NULL,
                response TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                source TEXT NOT NULL,
                session_id TEXT,
                language TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_interactions_query_hash ON interactions(query_hash);
            CREATE INDEX IF NOT EXISTS idx_interactions_session ON interactions(session_id);

            CREATE TABLE IF NOT EXISTS command_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                command TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                success INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert default settings for keys that have no stored value yet.
    pub fn seed_defaults(&self, defaults: &UserSettings) -> Result<()> {
        for value in defaults.values() {
            self.conn.execute(
                "INSERT OR IGNORE INTO user_settings (key, value) VALUES (?1, ?2)",
                params![value.key().as_str(), value.to_stored()],
            )?;
        }
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Upsert one setting; last write wins.
    pub fn update_setting(&self, value: SettingValue) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_settings (key, value) VALUES (?1, ?2)",
            params![value.key().as_str(), value.to_stored()],
        )?;
        debug!(
            target: "erenai::store",
            "Setting {} = {}",
            value.key().as_str(),
            value.to_stored()
        );
        Ok(())
    }

    /// Read all recognized settings, typed.
    ///
    /// Missing or unparseable values fall back to `defaults`.
    pub fn user_settings(&self, defaults: &UserSettings) -> Result<UserSettings> {
        let mut settings = *defaults;
        for key in SettingKey::ALL {
            let raw: Option<String> = self
                .conn
                .query_row(
                    "SELECT value FROM user_settings WHERE key = ?1",
                    params![key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(raw) = raw else { continue };
            match SettingValue::from_stored(key, &raw) {
                Some(value) => settings.apply(value),
                None => warn!(
                    target: "erenai::store",
                    "Ignoring invalid stored value {:?} for setting {}",
                    raw,
                    key.as_str()
                ),
            }
        }
        Ok(settings)
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    /// Append an interaction, returning its assigned id.
    pub fn insert_interaction(&self, interaction: &Interaction) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO interactions (
                query_hash, query, response, timestamp, source, session_id, language
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                interaction.query_fingerprint,
                interaction.query,
                interaction.response,
                interaction.timestamp.to_rfc3339(),
                interaction.source.as_str(),
                interaction.session_id,
                interaction.language.code(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Response of the most recent interaction with the given fingerprint.
    pub fn latest_response_by_fingerprint(&self, fingerprint: &str) -> Result<Option<String>> {
        let response = self
            .conn
            .query_row(
                "SELECT response FROM interactions WHERE query_hash = ?1 ORDER BY id DESC LIMIT 1",
                params![fingerprint],
                |row| row.get(0),
            )
            .optional()?;
        Ok(response)
    }

    /// The `limit` most recent interactions of a session, newest first.
    pub fn recent_interactions(&self, session_id: &str, limit: u32) -> Result<Vec<Interaction>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT * FROM interactions
            WHERE session_id = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )?;
        let rows = stmt
            .query_map(params![session_id, limit], |row| {
                Self::row_to_raw_interaction(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawInteraction::into_interaction).collect()
    }

    /// Total number of stored interactions.
    pub fn interaction_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // =========================================================================
    // Command history
    // =========================================================================

    /// Append a command history entry, returning its assigned id.
    pub fn insert_command(&self, entry: &CommandHistoryEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO command_history (command, timestamp, success) VALUES (?1, ?2, ?3)",
            params![entry.command, entry.timestamp.to_rfc3339(), entry.success as i32],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Commands of the `limit` most recent successful invocations, newest first.
    pub fn recent_successful_commands(&self, limit: u32) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT command FROM command_history WHERE success = 1 ORDER BY id DESC LIMIT ?1",
        )?;
        let commands = stmt
            .query_map(params![limit], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(commands)
    }

    /// The `limit` most recent command history entries, newest first.
    pub fn command_history(&self, limit: u32) -> Result<Vec<CommandHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, command, timestamp, success FROM command_history ORDER BY id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![limit], |row| {
                let timestamp: String = row.get("timestamp")?;
                let success: i32 = row.get("success")?;
                Ok(CommandHistoryEntry {
                    id: row.get("id")?,
                    command: row.get("command")?,
                    timestamp: parse_timestamp(&timestamp),
                    success: success != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // =========================================================================
    // Row conversion helpers
    // =========================================================================

    fn row_to_raw_interaction(row: &rusqlite::Row) -> rusqlite::Result<RawInteraction> {
        Ok(RawInteraction {
            id: row.get("id")?,
            query_hash: row.get("query_hash")?,
            query: row.get("query")?,
            response: row.get("response")?,
            timestamp: row.get("timestamp")?,
            source: row.get("source")?,
            session_id: row.get::<_, Option<String>>("session_id")?.unwrap_or_default(),
            language: row.get("language")?,
        })
    }
}

/// Interaction row before enum columns are validated.
struct RawInteraction {
    id: i64,
    query_hash: String,
    query: String,
    response: String,
    timestamp: String,
    source: String,
    session_id: String,
    language: Option<String>,
}

impl RawInteraction {
    fn into_interaction(self) -> Result<Interaction> {
        let source = InteractionSource::parse(&self.source).ok_or_else(|| {
            ErenaiError::CorruptRecord(format!(
                "interaction {} has unknown source '{}'",
                self.id, self.source
            ))
        })?;
        let language = match self.language.as_deref() {
            Some(code) => code.parse::<Locale>().map_err(|e| {
                ErenaiError::CorruptRecord(format!("interaction {}: {}", self.id, e))
            })?,
            None => Locale::Tr,
        };

        Ok(Interaction {
            id: self.id,
            query_fingerprint: self.query_hash,
            query: self.query,
            response: self.response,
            timestamp: parse_timestamp(&self.timestamp),
            source,
            session_id: self.session_id,
            language,
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use erenai_types::fingerprint;
    use tempfile::TempDir;

    fn create_test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open(&temp_dir.path().join("erenai.db")).unwrap();
        (store, temp_dir)
    }

    fn interaction(query: &str, response: &str, session_id: &str) -> Interaction {
        Interaction::new(query, response, InteractionSource::ModelQuery, session_id, Locale::En)
    }

    #[test]
    fn test_inserted_interaction_reads_back() {
        let (store, _dir) = create_test_store();

        let id = store
            .insert_interaction(&interaction("what is a pid", "a process id", "s-1"))
            .unwrap();

        let loaded = store.recent_interactions("s-1", 10).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);
        assert_eq!(loaded[0].query, "what is a pid");
        assert_eq!(loaded[0].query_fingerprint, fingerprint("what is a pid"));
        assert_eq!(loaded[0].source, InteractionSource::ModelQuery);
        assert_eq!(loaded[0].language, Locale::En);
        assert!(store.recent_interactions("s-2", 10).unwrap().is_empty());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let (store, _dir) = create_test_store();
        let first = store.insert_interaction(&interaction("a", "1", "s")).unwrap();
        let second = store.insert_interaction(&interaction("b", "2", "s")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_latest_response_wins() {
        let (store, _dir) = create_test_store();
        store.insert_interaction(&interaction("q", "old", "s-1")).unwrap();
        store.insert_interaction(&interaction("q", "new", "s-2")).unwrap();

        let response = store.latest_response_by_fingerprint(&fingerprint("q")).unwrap();
        assert_eq!(response.as_deref(), Some("new"));
        assert!(store
            .latest_response_by_fingerprint(&fingerprint("other"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_recent_interactions_scoped_to_session() {
        let (store, _dir) = create_test_store();
        store.insert_interaction(&interaction("a1", "r", "a")).unwrap();
        store.insert_interaction(&interaction("b1", "r", "b")).unwrap();
        store.insert_interaction(&interaction("a2", "r", "a")).unwrap();

        let recent = store.recent_interactions("a", 10).unwrap();
        let queries: Vec<_> = recent.iter().map(|i| i.query.as_str()).collect();
        assert_eq!(queries, vec!["a2", "a1"]);

        assert_eq!(store.recent_interactions("a", 1).unwrap().len(), 1);
        assert!(store.recent_interactions("a", 0).unwrap().is_empty());
    }

    #[test]
    fn test_settings_seed_and_update() {
        let (store, _dir) = create_test_store();
        let defaults = UserSettings::default();
        store.seed_defaults(&defaults).unwrap();
        assert_eq!(store.user_settings(&defaults).unwrap(), defaults);

        store.update_setting(SettingValue::ContextLength(7)).unwrap();
        store.update_setting(SettingValue::Language(Locale::En)).unwrap();

        // Seeding again must not clobber user choices
        store.seed_defaults(&defaults).unwrap();

        let settings = store.user_settings(&defaults).unwrap();
        assert_eq!(settings.context_length, 7);
        assert_eq!(settings.language, Locale::En);
        assert!(settings.command_suggestions);
    }

    #[test]
    fn test_invalid_stored_setting_falls_back() {
        let (store, _dir) = create_test_store();
        store
            .conn
            .execute(
                "INSERT INTO user_settings (key, value) VALUES ('context_length', 'lots')",
                [],
            )
            .unwrap();

        let settings = store.user_settings(&UserSettings::default()).unwrap();
        assert_eq!(settings.context_length, 5);
    }

    #[test]
    fn test_command_history() {
        let (store, _dir) = create_test_store();
        store.insert_command(&CommandHistoryEntry::new("ls", true)).unwrap();
        store.insert_command(&CommandHistoryEntry::new("false", false)).unwrap();
        store.insert_command(&CommandHistoryEntry::new("pwd", true)).unwrap();

        assert_eq!(store.recent_successful_commands(10).unwrap(), vec!["pwd", "ls"]);
        assert_eq!(store.recent_successful_commands(1).unwrap(), vec!["pwd"]);

        let history = store.command_history(10).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].command, "false");
        assert!(!history[1].success);
    }

    #[test]
    fn test_unknown_source_is_reported() {
        let (store, _dir) = create_test_store();
        store
            .conn
            .execute(
                "INSERT INTO interactions (query_hash, query, response, timestamp, source, session_id, language) \
                 VALUES ('h', 'q', 'r', '2025-01-01T00:00:00Z', 'gpt_api', 's', 'tr')",
                [],
            )
            .unwrap();

        let err = store.recent_interactions("s", 5).unwrap_err();
        assert!(matches!(err, ErenaiError::CorruptRecord(_)));
    }
}
