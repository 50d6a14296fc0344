//! TOML configuration file support (`memstack.toml`).
//!
//! Every field carries a serde default, so a partial file - or an empty one -
//! still yields the reference topology. Precedence is: explicit file when
//! given, environment otherwise.

use crate::types::{AppError, Result};
use crate::utils::config::StackConfig;
use std::fs;
use std::path::Path;
use tracing::info;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "memstack.toml";

impl StackConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: StackConfig = toml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Resolve configuration: the given file if any, else `memstack.toml`
    /// in the working directory if present, else environment variables.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_toml_file(path);
        }
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }
        Self::from_env()
    }

    /// Render this configuration as a commented starter `memstack.toml`.
    pub fn to_starter_toml(&self) -> Result<String> {
        let body = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("failed to render config: {}", e)))?;

        Ok(format!(
            "# memstack configuration\n\
             #\n\
             # Ports mirror the container stack: the API server is host-mapped to\n\
             # 8001 (8000 in-container), the graph store exposes 7474 (HTTP) and\n\
             # 7687 (Bolt), and the relational store is host-mapped to 15432.\n\
             # The LLM API key is read from the environment variable named by\n\
             # llm.api_key_env and never stored here.\n\n{}",
            body
        ))
    }
}
