//! Typed async client for the memory service REST API.
//!
//! The service is an external collaborator: it owns extraction, embedding,
//! and graph linking. This client only speaks its REST surface:
//!
//! | Method | Path              | Operation            |
//! |--------|-------------------|----------------------|
//! | POST   | /memories         | [`MemoryClient::add`]        |
//! | POST   | /search           | [`MemoryClient::search`]     |
//! | GET    | /memories         | [`MemoryClient::list`]       |
//! | GET    | /memories/{id}    | [`MemoryClient::get`]        |
//! | PUT    | /memories/{id}    | [`MemoryClient::update`]     |
//! | DELETE | /memories/{id}    | [`MemoryClient::delete`]     |
//! | DELETE | /memories         | [`MemoryClient::delete_all`] |

use crate::types::{
    AddMemoryRequest, AppError, ConversationTurn, MemoryListEnvelope, MemoryRecord, Result,
    SearchRequest, UpdateMemoryRequest,
};
use crate::utils::config::StackConfig;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default host-mapped API endpoint (container-internal port is 8000).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Storage-side operations on user-scoped memories.
///
/// Fronts [`MemoryClient`] so applications and tests can substitute their
/// own implementation (an in-memory fake, a caching wrapper).
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Submit conversation turns; returns the memories the service extracted.
    async fn add(
        &self,
        messages: Vec<ConversationTurn>,
        user_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Vec<MemoryRecord>>;

    /// Retrieve memories relevant to a query, most relevant first.
    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>>;

    /// List every memory stored for a user.
    async fn list(&self, user_id: &str) -> Result<Vec<MemoryRecord>>;

    /// Fetch one memory by id.
    async fn get(&self, memory_id: &str) -> Result<MemoryRecord>;

    /// Replace the text of one memory.
    async fn update(&self, memory_id: &str, data: &str) -> Result<MemoryRecord>;

    /// Delete one memory.
    async fn delete(&self, memory_id: &str) -> Result<()>;

    /// Delete every memory stored for a user.
    async fn delete_all(&self, user_id: &str) -> Result<()>;
}

/// HTTP client for the memory service.
pub struct MemoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl MemoryClient {
    /// Create a client against the given base URL.
    ///
    /// Trailing slashes are normalized away so endpoint paths join cleanly.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::InvalidInput("base URL must not be empty".into()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    /// Create a client from stack configuration.
    pub fn from_config(config: &StackConfig) -> Result<Self> {
        Self::with_timeout(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe service liveness via the interactive docs page.
    ///
    /// The API server serves its docs at `/docs`; a 200 there means the
    /// service process is up and answering HTTP.
    pub async fn health(&self) -> Result<()> {
        let response = self.http.get(self.endpoint("/docs")).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Api {
                status: response.status().as_u16(),
                message: "health probe failed".to_string(),
            })
        }
    }

    /// Map a non-success response into an [`AppError`].
    ///
    /// The server reports errors as JSON with a `detail` (FastAPI style) or
    /// `message` field; fall back to the raw body when neither parses.
    async fn error_from_response(response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| {
                json.get("detail")
                    .or_else(|| json.get("message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        AppError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Like [`Self::check`] but maps 404 to [`AppError::NotFound`] for
    /// endpoints addressing a single memory.
    async fn check_for(response: Response, memory_id: &str) -> Result<Response> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("memory {}", memory_id)));
        }
        Self::check(response).await
    }
}

#[async_trait]
impl MemoryStore for MemoryClient {
    async fn add(
        &self,
        messages: Vec<ConversationTurn>,
        user_id: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Vec<MemoryRecord>> {
        if messages.is_empty() {
            return Err(AppError::InvalidInput(
                "add requires at least one conversation turn".into(),
            ));
        }

        debug!(user_id, turns = messages.len(), "adding memories");

        let request = AddMemoryRequest {
            messages,
            user_id: user_id.to_string(),
            metadata,
        };

        let response = self
            .http
            .post(self.endpoint("/memories"))
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let envelope: MemoryListEnvelope = response.json().await?;
        Ok(envelope.into_records())
    }

    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>> {
        debug!(user_id, query, "searching memories");

        let request = SearchRequest {
            query: query.to_string(),
            user_id: user_id.to_string(),
            limit,
        };

        let response = self
            .http
            .post(self.endpoint("/search"))
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let envelope: MemoryListEnvelope = response.json().await?;
        Ok(envelope.into_records())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<MemoryRecord>> {
        let response = self
            .http
            .get(self.endpoint("/memories"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let response = Self::check(response).await?;

        let envelope: MemoryListEnvelope = response.json().await?;
        Ok(envelope.into_records())
    }

    async fn get(&self, memory_id: &str) -> Result<MemoryRecord> {
        let response = self
            .http
            .get(self.endpoint(&format!("/memories/{}", memory_id)))
            .send()
            .await?;
        let response = Self::check_for(response, memory_id).await?;

        Ok(response.json().await?)
    }

    async fn update(&self, memory_id: &str, data: &str) -> Result<MemoryRecord> {
        if data.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "updated memory text must not be empty".into(),
            ));
        }

        let request = UpdateMemoryRequest {
            data: data.to_string(),
        };

        let response = self
            .http
            .put(self.endpoint(&format!("/memories/{}", memory_id)))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_for(response, memory_id).await?;

        Ok(response.json().await?)
    }

    async fn delete(&self, memory_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/memories/{}", memory_id)))
            .send()
            .await?;
        Self::check_for(response, memory_id).await?;
        Ok(())
    }

    async fn delete_all(&self, user_id: &str) -> Result<()> {
        debug!(user_id, "deleting all memories");

        let response = self
            .http
            .delete(self.endpoint("/memories"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
