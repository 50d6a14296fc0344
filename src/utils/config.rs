//! Stack configuration: API endpoint, backing stores, LLM provider.
//!
//! Defaults reproduce the reference deployment topology: the API server
//! host-mapped to 8001 (8000 in-container), the graph store on 7474/7687,
//! and the shared relational database host-mapped to 15432 so it does not
//! collide with a locally running instance.

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Root configuration for the memory stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub graph: GraphStoreConfig,
    #[serde(default)]
    pub relational: RelationalStoreConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

// ============= API Server =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host-mapped base URL of the API server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============= Graph Store =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStoreConfig {
    #[serde(default = "default_graph_host")]
    pub host: String,

    /// Browser/HTTP interface port.
    #[serde(default = "default_graph_http_port")]
    pub http_port: u16,

    /// Bolt protocol port used by the API server.
    #[serde(default = "default_graph_bolt_port")]
    pub bolt_port: u16,

    #[serde(default = "default_graph_username")]
    pub username: String,

    #[serde(default = "default_graph_password")]
    pub password: String,
}

fn default_graph_host() -> String {
    "localhost".to_string()
}

fn default_graph_http_port() -> u16 {
    7474
}

fn default_graph_bolt_port() -> u16 {
    7687
}

fn default_graph_username() -> String {
    "neo4j".to_string()
}

fn default_graph_password() -> String {
    "mem0graph".to_string()
}

impl Default for GraphStoreConfig {
    fn default() -> Self {
        Self {
            host: default_graph_host(),
            http_port: default_graph_http_port(),
            bolt_port: default_graph_bolt_port(),
            username: default_graph_username(),
            password: default_graph_password(),
        }
    }
}

// ============= Relational Store (vector extension) =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationalStoreConfig {
    #[serde(default = "default_pg_host")]
    pub host: String,

    /// Host-mapped port; in-container the database listens on 5432.
    #[serde(default = "default_pg_port")]
    pub port: u16,

    #[serde(default = "default_pg_database")]
    pub database: String,

    #[serde(default = "default_pg_username")]
    pub username: String,

    #[serde(default = "default_pg_password")]
    pub password: String,
}

fn default_pg_host() -> String {
    "localhost".to_string()
}

fn default_pg_port() -> u16 {
    15432
}

fn default_pg_database() -> String {
    "mem0".to_string()
}

fn default_pg_username() -> String {
    "postgres".to_string()
}

fn default_pg_password() -> String {
    "postgres".to_string()
}

impl Default for RelationalStoreConfig {
    fn default() -> Self {
        Self {
            host: default_pg_host(),
            port: default_pg_port(),
            database: default_pg_database(),
            username: default_pg_username(),
            password: default_pg_password(),
        }
    }
}

// ============= LLM Provider =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider the API server extracts memories with.
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Name of the environment variable holding the provider API key.
    /// The key itself never lands in a config file.
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key_env: default_llm_api_key_env(),
            model: default_llm_model(),
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            graph: GraphStoreConfig::default(),
            relational: RelationalStoreConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, fallback: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", name, value))),
        Err(_) => Ok(fallback),
    }
}

impl StackConfig {
    /// Load configuration from `MEMSTACK_*` environment variables, filling
    /// gaps with the reference topology defaults. Reads `.env` first when
    /// one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            api: ApiConfig {
                base_url: env::var("MEMSTACK_API_URL").unwrap_or(defaults.api.base_url),
                timeout_secs: env_or("MEMSTACK_API_TIMEOUT_SECS", defaults.api.timeout_secs)?,
            },
            graph: GraphStoreConfig {
                host: env::var("MEMSTACK_GRAPH_HOST").unwrap_or(defaults.graph.host),
                http_port: env_or("MEMSTACK_GRAPH_HTTP_PORT", defaults.graph.http_port)?,
                bolt_port: env_or("MEMSTACK_GRAPH_BOLT_PORT", defaults.graph.bolt_port)?,
                username: env::var("MEMSTACK_GRAPH_USER").unwrap_or(defaults.graph.username),
                password: env::var("MEMSTACK_GRAPH_PASSWORD").unwrap_or(defaults.graph.password),
            },
            relational: RelationalStoreConfig {
                host: env::var("MEMSTACK_PG_HOST").unwrap_or(defaults.relational.host),
                port: env_or("MEMSTACK_PG_PORT", defaults.relational.port)?,
                database: env::var("MEMSTACK_PG_DATABASE").unwrap_or(defaults.relational.database),
                username: env::var("MEMSTACK_PG_USER").unwrap_or(defaults.relational.username),
                password: env::var("MEMSTACK_PG_PASSWORD").unwrap_or(defaults.relational.password),
            },
            llm: LlmConfig {
                provider: env::var("MEMSTACK_LLM_PROVIDER").unwrap_or(defaults.llm.provider),
                api_key_env: env::var("MEMSTACK_LLM_API_KEY_ENV").unwrap_or(defaults.llm.api_key_env),
                model: env::var("MEMSTACK_LLM_MODEL").unwrap_or(defaults.llm.model),
            },
        })
    }

    /// Validate that the configuration is internally usable.
    pub fn validate(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "api.base_url must be an http(s) URL, got: {}",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::Config("api.timeout_secs must be non-zero".into()));
        }
        if self.graph.username.is_empty() || self.graph.password.is_empty() {
            return Err(AppError::Config("graph store credentials must be set".into()));
        }
        if self.graph.http_port == 0 || self.graph.bolt_port == 0 {
            return Err(AppError::Config("graph store ports must be non-zero".into()));
        }
        if self.relational.port == 0 {
            return Err(AppError::Config("relational store port must be non-zero".into()));
        }
        if self.relational.database.is_empty() || self.relational.username.is_empty() {
            return Err(AppError::Config(
                "relational store database and user must be set".into(),
            ));
        }
        if self.llm.provider.is_empty() {
            return Err(AppError::Config("llm.provider must be set".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_topology() {
        let config = StackConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8001");
        assert_eq!(config.graph.http_port, 7474);
        assert_eq!(config.graph.bolt_port, 7687);
        assert_eq!(config.graph.username, "neo4j");
        assert_eq!(config.graph.password, "mem0graph");
        assert_eq!(config.relational.port, 15432);
    }

    #[test]
    fn test_defaults_validate() {
        StackConfig::default().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = StackConfig::default();
        config.api.base_url = "localhost:8001".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = StackConfig::default();
        config.relational.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let mut config = StackConfig::default();
        config.graph.password = String::new();
        assert!(config.validate().is_err());
    }
}
