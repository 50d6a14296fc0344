//! Prompt-context helpers for the search-then-add chat flow.
//!
//! This module provides utilities for:
//! - Recalling memories before a chat turn, with graceful degradation
//! - Formatting recalled memories for LLM prompts
//! - Submitting the finished exchange back to the service
//!
//! Memory storage lives entirely in the external service; these helpers only
//! shape its output for prompts and feed conversations back into it.

use crate::client::MemoryStore;
use crate::types::{ConversationTurn, MemoryRecord};
use tracing::warn;

/// Maximum number of memories to include in a prompt to avoid token overflow.
pub const MAX_MEMORIES_IN_PROMPT: usize = 8;

/// Search hits scoring below this are dropped from prompt context.
pub const MIN_RELEVANCE_SCORE: f32 = 0.3;

/// Default number of recent turns to keep when windowing a conversation.
pub const DEFAULT_TURN_WINDOW: usize = 10;

/// Formats recalled memories into a block suitable for a system prompt.
///
/// Memories without a score (list results) are kept; scored search hits
/// below [`MIN_RELEVANCE_SCORE`] are dropped. Returns an empty string when
/// nothing survives, so callers can splice the result in unconditionally.
///
/// # Example
/// ```ignore
/// let context = format_memories_for_prompt(&hits);
/// // "Relevant memories about this user:\n- Prefers vegetarian food\n- Lives in Lisbon"
/// ```
pub fn format_memories_for_prompt(memories: &[MemoryRecord]) -> String {
    let lines: Vec<String> = memories
        .iter()
        .filter(|m| m.score.map_or(true, |s| s >= MIN_RELEVANCE_SCORE))
        .take(MAX_MEMORIES_IN_PROMPT)
        .map(|m| format!("- {}", m.memory))
        .collect();

    if lines.is_empty() {
        String::new()
    } else {
        format!("Relevant memories about this user:\n{}", lines.join("\n"))
    }
}

/// Truncates a conversation to a window of recent turns.
pub fn truncate_turns(turns: &[ConversationTurn], window: usize) -> Vec<ConversationTurn> {
    if turns.len() <= window {
        turns.to_vec()
    } else {
        turns[turns.len() - window..].to_vec()
    }
}

/// Searches for relevant memories, degrading to an empty context when the
/// service is unreachable or failing.
///
/// Only availability failures (transport errors, 5xx) are swallowed; a
/// rejected request (4xx) still surfaces so callers see their own bugs.
pub async fn recall_or_empty(
    store: &dyn MemoryStore,
    query: &str,
    user_id: &str,
    limit: Option<usize>,
) -> crate::types::Result<Vec<MemoryRecord>> {
    match store.search(query, user_id, limit).await {
        Ok(memories) => Ok(memories),
        Err(e) if e.is_unavailable() => {
            warn!(user_id, error = %e, "memory service unavailable, continuing without context");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Buffers one user/assistant exchange and submits it for memory extraction.
///
/// The add happens after the assistant reply so the service sees the full
/// exchange. A failed add is logged and swallowed: the conversation must not
/// fail because persistence did.
pub struct RememberedExchange {
    user_id: String,
    turns: Vec<ConversationTurn>,
}

impl RememberedExchange {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            turns: Vec::new(),
        }
    }

    /// Record the user's message.
    pub fn user_says(&mut self, content: impl Into<String>) -> &mut Self {
        self.turns.push(ConversationTurn::user(content));
        self
    }

    /// Record the assistant's reply.
    pub fn assistant_says(&mut self, content: impl Into<String>) -> &mut Self {
        self.turns.push(ConversationTurn::assistant(content));
        self
    }

    /// Turns buffered so far.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Submit the buffered exchange to the service.
    ///
    /// Returns how many memories the service extracted, or 0 when the
    /// exchange was empty or the add failed.
    pub async fn commit(self, store: &dyn MemoryStore) -> usize {
        if self.turns.is_empty() {
            return 0;
        }

        match store.add(self.turns, &self.user_id, None).await {
            Ok(extracted) => extracted.len(),
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "failed to persist exchange");
                0
            }
        }
    }
}
