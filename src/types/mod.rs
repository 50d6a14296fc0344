//! Core types for the memory service API and error handling.
//!
//! These mirror the resource shapes of the external memory service. The
//! service owns the memory lifecycle entirely; everything here is a wire
//! representation, not a storage model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Memory Resources =============

/// A stored memory record, scoped to a single user.
///
/// The service extracts these from conversations submitted to the add
/// endpoint. Embedding and graph metadata are owned by the service and
/// never surfaced here beyond the opaque `metadata` blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Service-assigned identifier.
    pub id: String,
    /// The extracted memory text.
    pub memory: String,
    /// Owning user.
    #[serde(default)]
    pub user_id: String,
    /// Opaque metadata attached at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Relevance score, present only on search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One turn of a conversation submitted to the add endpoint.
///
/// Transient input only - the service extracts memories from turns and
/// discards the turns themselves as far as this client is concerned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
        }
    }
}

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

// ============= Request/Response Shapes =============

#[derive(Debug, Clone, Serialize)]
pub struct AddMemoryRequest {
    pub messages: Vec<ConversationTurn>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMemoryRequest {
    pub data: String,
}

/// Collection envelope used by the service.
///
/// The self-hosted server has shipped both `{"results": [...]}` and a bare
/// array depending on version, so both forms deserialize.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MemoryListEnvelope {
    Wrapped { results: Vec<MemoryRecord> },
    Bare(Vec<MemoryRecord>),
}

impl MemoryListEnvelope {
    pub fn into_records(self) -> Vec<MemoryRecord> {
        match self {
            Self::Wrapped { results } => results,
            Self::Bare(records) => records,
        }
    }
}

/// Acknowledgement body returned by the delete endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: String,
}

// ============= Error Types =============

/// Errors surfaced by the client, config, and stack layers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Container stack operation failure (compose invocation, probe).
    #[error("Stack error: {0}")]
    Stack(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Whether this error means the service is unreachable or failing,
    /// as opposed to rejecting a well-formed request.
    ///
    /// Callers building prompt context treat unavailable as "no memory
    /// context available" and fall back to an empty context.
    pub fn is_unavailable(&self) -> bool {
        match self {
            AppError::Http(_) => true,
            AppError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turn_role_serializes_lowercase() {
        let turn = ConversationTurn::user("hello");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_memory_record_ignores_unknown_fields() {
        let record: MemoryRecord = serde_json::from_value(json!({
            "id": "m1",
            "memory": "Likes hiking",
            "user_id": "alice",
            "hash": "abc123",
            "event": "ADD"
        }))
        .unwrap();
        assert_eq!(record.id, "m1");
        assert_eq!(record.memory, "Likes hiking");
        assert!(record.score.is_none());
    }

    #[test]
    fn test_memory_record_optional_fields_skipped() {
        let record = MemoryRecord {
            id: "m1".to_string(),
            memory: "test".to_string(),
            user_id: "alice".to_string(),
            metadata: None,
            score: None,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("metadata"));
        assert!(!json.contains("score"));
    }

    #[test]
    fn test_list_envelope_wrapped() {
        let envelope: MemoryListEnvelope = serde_json::from_value(json!({
            "results": [{"id": "m1", "memory": "a", "user_id": "u"}]
        }))
        .unwrap();
        assert_eq!(envelope.into_records().len(), 1);
    }

    #[test]
    fn test_list_envelope_bare_array() {
        let envelope: MemoryListEnvelope =
            serde_json::from_value(json!([{"id": "m1", "memory": "a", "user_id": "u"}])).unwrap();
        assert_eq!(envelope.into_records().len(), 1);
    }

    #[test]
    fn test_search_request_omits_absent_limit() {
        let req = SearchRequest {
            query: "food".to_string(),
            user_id: "alice".to_string(),
            limit: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("limit"));
    }

    #[test]
    fn test_api_error_unavailable_classification() {
        let server_err = AppError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        let client_err = AppError::Api {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(server_err.is_unavailable());
        assert!(!client_err.is_unavailable());
        assert!(!AppError::NotFound("m1".to_string()).is_unavailable());
    }
}
