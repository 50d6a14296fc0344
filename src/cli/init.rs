//! Init command implementation
//!
//! Scaffolds a memory stack deployment: configuration file, compose file,
//! and an environment template carrying the endpoint/credential table.

use super::output::Output;
use crate::stack::{render_compose, StackTopology};
use crate::utils::config::StackConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (memstack.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

/// Run the init command
pub fn run(init: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing memory stack");

    let base_path = &init.path;

    let config_path = base_path.join("memstack.toml");
    if config_path.exists() && !init.force {
        output.warning("memstack.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
    }

    let config = StackConfig::default();
    let topology = StackTopology::from_config(&config);

    let starter = match config.to_starter_toml() {
        Ok(starter) => starter,
        Err(e) => {
            output.error(&format!("Failed to render configuration: {}", e));
            return InitResult::Error(e.to_string());
        }
    };

    let files: [(&str, &str, String); 3] = [
        ("config", "memstack.toml", starter),
        ("compose", "docker-compose.yml", render_compose(&topology)),
        ("env", ".env.example", env_example(&config)),
    ];

    for (file_type, name, contents) in files {
        let path = base_path.join(name);
        if path.exists() && !init.force {
            output.skipped(name, "already exists");
            continue;
        }
        if let Err(e) = fs::write(&path, contents) {
            output.error(&format!("Failed to write {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(file_type, name);
    }

    output.success("Stack initialized");
    output.hint("Copy .env.example to .env and set your LLM API key");
    output.hint("Then run: memstack up");

    InitResult::Success
}

/// Render the endpoint/credential table as an environment template.
fn env_example(config: &StackConfig) -> String {
    format!(
        "# memstack environment\n\
         #\n\
         # Copy to .env and fill in the LLM API key. Everything else defaults\n\
         # to the reference container topology.\n\n\
         # API server (host-mapped; in-container port is 8000)\n\
         MEMSTACK_API_URL={base_url}\n\n\
         # Graph store\n\
         MEMSTACK_GRAPH_HOST={graph_host}\n\
         MEMSTACK_GRAPH_HTTP_PORT={graph_http}\n\
         MEMSTACK_GRAPH_BOLT_PORT={graph_bolt}\n\
         MEMSTACK_GRAPH_USER={graph_user}\n\
         MEMSTACK_GRAPH_PASSWORD={graph_password}\n\n\
         # Relational store (shared instance, vector extension enabled)\n\
         MEMSTACK_PG_HOST={pg_host}\n\
         MEMSTACK_PG_PORT={pg_port}\n\
         MEMSTACK_PG_DATABASE={pg_db}\n\
         MEMSTACK_PG_USER={pg_user}\n\
         MEMSTACK_PG_PASSWORD={pg_password}\n\n\
         # LLM provider used by the API server for extraction\n\
         MEMSTACK_LLM_PROVIDER={llm_provider}\n\
         MEMSTACK_LLM_MODEL={llm_model}\n\
         {llm_key_env}=sk-...\n",
        base_url = config.api.base_url,
        graph_host = config.graph.host,
        graph_http = config.graph.http_port,
        graph_bolt = config.graph.bolt_port,
        graph_user = config.graph.username,
        graph_password = config.graph.password,
        pg_host = config.relational.host,
        pg_port = config.relational.port,
        pg_db = config.relational.database,
        pg_user = config.relational.username,
        pg_password = config.relational.password,
        llm_provider = config.llm.provider,
        llm_model = config.llm.model,
        llm_key_env = config.llm.api_key_env,
    )
}

/// Check whether a directory already holds an initialized stack.
pub fn is_initialized(path: &Path) -> bool {
    path.join("memstack.toml").exists()
}
