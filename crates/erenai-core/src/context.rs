//! Conversation context assembly.

use crate::{Result, Store};
use erenai_types::{ChatMessage, ContextTurn};

/// The `limit` most recent turns of `session_id`, oldest first.
///
/// Only already-logged interactions are considered, so the query being
/// answered is never part of its own context.
pub fn build_context(store: &Store, session_id: &str, limit: u32) -> Result<Vec<ContextTurn>> {
    let mut turns: Vec<ContextTurn> = store
        .recent_interactions(session_id, limit)?
        .into_iter()
        .map(|i| ContextTurn {
            query: i.query,
            response: i.response,
        })
        .collect();
    turns.reverse();
    Ok(turns)
}

/// Messages following the system prompt in a model call: each context turn
/// as a user/assistant pair, then the current query.
pub fn build_messages(context: &[ContextTurn], query: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(context.len() * 2 + 1);
    messages.extend(context.iter().flat_map(ContextTurn::to_messages));
    messages.push(ChatMessage::user(query));
    messages
}
