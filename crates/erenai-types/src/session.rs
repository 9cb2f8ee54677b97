//! Conversation session pointer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted pointer to the active conversation session.
///
/// Sessions are not time-bounded: the same id is reused across process
/// invocations until the pointer file is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque, UUID-shaped identifier.
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}
