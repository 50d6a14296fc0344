//! Container stack topology and operations.
//!
//! The memory service runs as three containers: a graph store, a shared
//! relational database carrying the vector extension, and the prebuilt API
//! server wired to both. This module models that topology, renders it as a
//! compose file for `init`, shells out to `docker compose` for the
//! operational commands, and probes the mapped ports for `status`.

use crate::client::MemoryClient;
use crate::types::{AppError, Result};
use crate::utils::config::StackConfig;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Connect timeout for port probes.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

// ============= Topology =============

/// One container in the stack.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub image: String,
    /// `host:container` port mappings.
    pub ports: Vec<(u16, u16)>,
    /// Environment entries as `KEY=VALUE` (values may be `${VAR}` pass-throughs).
    pub environment: Vec<String>,
    /// `volume:mountpoint` pairs.
    pub volumes: Vec<(String, String)>,
    pub depends_on: Vec<String>,
}

/// The three-service deployment, derived from configuration.
#[derive(Debug, Clone)]
pub struct StackTopology {
    pub services: Vec<ServiceSpec>,
}

impl StackTopology {
    /// Build the reference topology from configuration.
    pub fn from_config(config: &StackConfig) -> Self {
        let graph = ServiceSpec {
            name: "graph".to_string(),
            image: "neo4j:5.26".to_string(),
            ports: vec![
                (config.graph.http_port, 7474),
                (config.graph.bolt_port, 7687),
            ],
            environment: vec![format!(
                "NEO4J_AUTH={}/{}",
                config.graph.username, config.graph.password
            )],
            volumes: vec![("graph_data".to_string(), "/data".to_string())],
            depends_on: vec![],
        };

        let postgres = ServiceSpec {
            name: "postgres".to_string(),
            image: "pgvector/pgvector:pg16".to_string(),
            ports: vec![(config.relational.port, 5432)],
            environment: vec![
                format!("POSTGRES_DB={}", config.relational.database),
                format!("POSTGRES_USER={}", config.relational.username),
                format!("POSTGRES_PASSWORD={}", config.relational.password),
            ],
            volumes: vec![(
                "postgres_data".to_string(),
                "/var/lib/postgresql/data".to_string(),
            )],
            depends_on: vec![],
        };

        let api_host_port = host_port_of(&config.api.base_url).unwrap_or(8001);
        let api = ServiceSpec {
            name: "api".to_string(),
            image: "mem0ai/mem0-api-server:latest".to_string(),
            ports: vec![(api_host_port, 8000)],
            environment: vec![
                // Container-internal wiring uses service names and
                // in-container ports, not the host mappings.
                "NEO4J_URI=bolt://graph:7687".to_string(),
                format!("NEO4J_USERNAME={}", config.graph.username),
                format!("NEO4J_PASSWORD={}", config.graph.password),
                "POSTGRES_HOST=postgres".to_string(),
                "POSTGRES_PORT=5432".to_string(),
                format!("POSTGRES_DB={}", config.relational.database),
                format!("POSTGRES_USER={}", config.relational.username),
                format!("POSTGRES_PASSWORD={}", config.relational.password),
                format!("LLM_PROVIDER={}", config.llm.provider),
                format!("LLM_MODEL={}", config.llm.model),
                format!("{key}=${{{key}}}", key = config.llm.api_key_env),
            ],
            volumes: vec![],
            depends_on: vec!["graph".to_string(), "postgres".to_string()],
        };

        Self {
            services: vec![graph, postgres, api],
        }
    }

    /// Names of all services, in dependency order.
    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Extract the port from an `http(s)://host:port` URL.
fn host_port_of(base_url: &str) -> Option<u16> {
    let rest = base_url.split("://").nth(1)?;
    let authority = rest.split('/').next()?;
    authority.rsplit(':').next()?.parse().ok()
}

/// Render the topology as a docker-compose file.
///
/// Plain string building keeps the output stable and diff-friendly; the file
/// is written once by `init` and hand-edited afterwards.
pub fn render_compose(topology: &StackTopology) -> String {
    let mut out = String::from("services:\n");
    let mut volume_names: Vec<String> = Vec::new();

    for service in &topology.services {
        out.push_str(&format!("  {}:\n", service.name));
        out.push_str(&format!("    image: {}\n", service.image));

        if !service.ports.is_empty() {
            out.push_str("    ports:\n");
            for (host, container) in &service.ports {
                out.push_str(&format!("      - \"{}:{}\"\n", host, container));
            }
        }

        if !service.environment.is_empty() {
            out.push_str("    environment:\n");
            for entry in &service.environment {
                out.push_str(&format!("      - {}\n", entry));
            }
        }

        if !service.volumes.is_empty() {
            out.push_str("    volumes:\n");
            for (volume, mount) in &service.volumes {
                out.push_str(&format!("      - {}:{}\n", volume, mount));
                if !volume_names.contains(volume) {
                    volume_names.push(volume.clone());
                }
            }
        }

        if !service.depends_on.is_empty() {
            out.push_str("    depends_on:\n");
            for dep in &service.depends_on {
                out.push_str(&format!("      - {}\n", dep));
            }
        }

        out.push_str("    restart: unless-stopped\n");
    }

    if !volume_names.is_empty() {
        out.push_str("\nvolumes:\n");
        for volume in &volume_names {
            out.push_str(&format!("  {}:\n", volume));
        }
    }

    out
}

// ============= Compose Operations =============

/// Runs `docker compose` subcommands against the stack's compose file.
pub struct ComposeRunner {
    compose_file: String,
}

impl ComposeRunner {
    pub fn new(compose_file: impl Into<String>) -> Self {
        Self {
            compose_file: compose_file.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<()> {
        let mut cmd = tokio::process::Command::new("docker");
        cmd.arg("compose").arg("-f").arg(&self.compose_file).args(args);
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

        debug!(?args, file = %self.compose_file, "running docker compose");

        let status = cmd
            .status()
            .await
            .map_err(|e| AppError::Stack(format!("failed to invoke docker compose: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::Stack(format!(
                "docker compose {} exited with {}",
                args.join(" "),
                status
            )))
        }
    }

    /// Start the stack in the background (`up -d`).
    pub async fn up(&self) -> Result<()> {
        self.run(&["up", "-d"]).await
    }

    /// Stop and remove the containers (`down`).
    pub async fn down(&self) -> Result<()> {
        self.run(&["down"]).await
    }

    /// Show logs, optionally for one service, optionally following.
    pub async fn logs(&self, service: Option<&str>, follow: bool) -> Result<()> {
        let mut args = vec!["logs"];
        if follow {
            args.push("--follow");
        }
        if let Some(service) = service {
            args.push(service);
        }
        self.run(&args).await
    }

    /// Show container status (`ps`).
    pub async fn ps(&self) -> Result<()> {
        self.run(&["ps"]).await
    }
}

// ============= Health Probes =============

/// Probe result for one service endpoint.
#[derive(Debug, Clone)]
pub struct ServiceHealth {
    pub name: String,
    pub endpoint: String,
    pub up: bool,
}

/// Per-service health snapshot of the running stack.
#[derive(Debug, Clone)]
pub struct StackStatus {
    pub services: Vec<ServiceHealth>,
}

impl StackStatus {
    /// Whether every probed endpoint answered.
    pub fn all_up(&self) -> bool {
        self.services.iter().all(|s| s.up)
    }

    /// Probe the API server over HTTP and the store ports over TCP.
    pub async fn check(config: &StackConfig, client: &MemoryClient) -> Self {
        let api_up = client.health().await.is_ok();

        let graph_http = probe_port(&config.graph.host, config.graph.http_port).await;
        let graph_bolt = probe_port(&config.graph.host, config.graph.bolt_port).await;
        let relational = probe_port(&config.relational.host, config.relational.port).await;

        Self {
            services: vec![
                ServiceHealth {
                    name: "api".to_string(),
                    endpoint: format!("{}/docs", client.base_url()),
                    up: api_up,
                },
                ServiceHealth {
                    name: "graph (http)".to_string(),
                    endpoint: format!("{}:{}", config.graph.host, config.graph.http_port),
                    up: graph_http,
                },
                ServiceHealth {
                    name: "graph (bolt)".to_string(),
                    endpoint: format!("{}:{}", config.graph.host, config.graph.bolt_port),
                    up: graph_bolt,
                },
                ServiceHealth {
                    name: "postgres".to_string(),
                    endpoint: format!("{}:{}", config.relational.host, config.relational.port),
                    up: relational,
                },
            ],
        }
    }
}

/// TCP connect probe with a short timeout.
pub async fn probe_port(host: &str, port: u16) -> bool {
    let address = format!("{}:{}", host, port);
    matches!(
        tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect(&address)).await,
        Ok(Ok(_))
    )
}
