//! Content-addressed response cache over the interaction log.
//!
//! There is no separate write path: every logged interaction is a cache
//! entry. The cache is global across sessions.

use crate::{Result, Store};
use erenai_types::fingerprint;
use tracing::debug;

/// Response of the most recent interaction whose query equals `query`.
pub fn lookup(store: &Store, query: &str) -> Result<Option<String>> {
    let hit = store.latest_response_by_fingerprint(&fingerprint(query))?;
    debug!(
        target: "erenai::cache",
        "Cache {} for {:?}",
        if hit.is_some() { "hit" } else { "miss" },
        query
    );
    Ok(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use erenai_types::{Interaction, InteractionSource, Locale};
    use tempfile::TempDir;

    #[test]
    fn test_lookup_is_exact_and_global() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("erenai.db")).unwrap();
        store
            .insert_interaction(&Interaction::new(
                "What is inode?",
                "An index node.",
                InteractionSource::ModelQuery,
                "old-session",
                Locale::En,
            ))
            .unwrap();

        assert_eq!(
            lookup(&store, "What is inode?").unwrap().as_deref(),
            Some("An index node.")
        );
        assert!(lookup(&store, "what is inode?").unwrap().is_none());
        assert!(lookup(&store, "What is inode? ").unwrap().is_none());
    }
}
