//! Session tracking via a persisted JSON pointer file.

use crate::{ErenaiError, Result};
use chrono::Utc;
use erenai_types::SessionRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Produces and reuses the active session identifier.
///
/// The pointer file is read on every access, so removing it externally
/// starts a new session on the next interaction.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    path: PathBuf,
}

impl SessionTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the persisted session, creating one if absent or unreadable.
    pub fn current(&self) -> Result<SessionRecord> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<SessionRecord>(&content) {
                Ok(record) if !record.session_id.trim().is_empty() => return Ok(record),
                Ok(_) => warn!(target: "erenai::session", "Session file has empty id, replacing"),
                Err(e) => warn!(target: "erenai::session", "Unreadable session file ({}), replacing", e),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        self.create()
    }

    /// Current session id.
    pub fn session_id(&self) -> Result<String> {
        Ok(self.current()?.session_id)
    }

    /// Remove the persisted pointer. Returns whether one existed.
    pub fn rotate(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(target: "erenai::session", "Session pointer removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self) -> Result<SessionRecord> {
        let record = SessionRecord {
            session_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&record)?;
        std::fs::write(&self.path, json).map_err(|e| {
            ErenaiError::SessionError(format!("cannot write {}: {}", self.path.display(), e))
        })?;

        info!(target: "erenai::session", "Started session {}", record.session_id);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_is_created_lazily_and_reused() {
        let dir = TempDir::new().unwrap();
        let tracker = SessionTracker::new(dir.path().join("nested").join("session.json"));
        assert!(!tracker.path().exists());

        let first = tracker.session_id().unwrap();
        assert!(tracker.path().exists());
        assert!(Uuid::parse_str(&first).is_ok());

        // A second tracker on the same file models a new process invocation
        let again = SessionTracker::new(tracker.path()).session_id().unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_rotate_starts_new_session() {
        let dir = TempDir::new().unwrap();
        let tracker = SessionTracker::new(dir.path().join("session.json"));

        let first = tracker.session_id().unwrap();
        assert!(tracker.rotate().unwrap());
        assert!(!tracker.rotate().unwrap());

        let second = tracker.session_id().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let tracker = SessionTracker::new(&path);
        let record = tracker.current().unwrap();
        assert!(!record.session_id.is_empty());

        let stored: SessionRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored, record);
    }

    #[test]
    fn test_foreign_session_id_is_kept_opaque() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"session_id":"legacy-session","created_at":"2025-03-01T10:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(SessionTracker::new(&path).session_id().unwrap(), "legacy-session");
    }
}
