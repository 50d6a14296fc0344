//! # memstack
//!
//! Client SDK and operations CLI for a self-hosted vector + graph memory
//! service. The service itself - extraction, embeddings, graph linking - is
//! an external collaborator reachable only over REST; this crate covers the
//! client side of that boundary plus the wiring of the container stack the
//! service runs in.
//!
//! ## Overview
//!
//! memstack can be used in two ways:
//!
//! 1. **As a CLI** - Run the `memstack` binary to scaffold, start, probe,
//!    and talk to the stack.
//! 2. **As a library** - Embed [`MemoryClient`] into your own application's
//!    chat loop.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use memstack::{ConversationTurn, MemoryClient, MemoryStore};
//! use memstack::context::{format_memories_for_prompt, recall_or_empty};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MemoryClient::new("http://localhost:8001")?;
//!
//!     // Before answering: recall relevant context (degrades to empty
//!     // context when the service is down).
//!     let memories = recall_or_empty(&client, "what does she eat", "alice", Some(5)).await?;
//!     let context = format_memories_for_prompt(&memories);
//!
//!     // ... run your LLM call with `context` in the system prompt ...
//!
//!     // After answering: feed the exchange back for extraction.
//!     let turns = vec![
//!         ConversationTurn::user("I'm vegetarian, by the way"),
//!         ConversationTurn::assistant("Noted - no meat suggestions."),
//!     ];
//!     client.add(turns, "alice", None).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`] - Typed async REST client for the memory service
//! - [`context`] - Search-then-add prompt context helpers
//! - [`stack`] - Container topology, compose operations, health probes
//! - [`cli`] - Command-line interface
//! - [`types`] - Wire types and error handling
//! - [`utils`] - Configuration (environment and TOML)

#![warn(missing_docs)]

/// Command-line interface parsing and output.
pub mod cli;
/// REST client for the memory service.
pub mod client;
/// Prompt-context helpers for the search-then-add flow.
pub mod context;
/// Container stack topology and operations.
pub mod stack;
/// Wire types and error handling.
pub mod types;
/// Configuration utilities (environment, TOML).
pub mod utils;

// Re-export commonly used types
pub use client::{MemoryClient, MemoryStore, DEFAULT_BASE_URL};
pub use context::{format_memories_for_prompt, recall_or_empty, RememberedExchange};
pub use stack::{ComposeRunner, StackStatus, StackTopology};
pub use types::{AppError, ConversationTurn, MemoryRecord, Result, TurnRole};
pub use utils::config::StackConfig;
