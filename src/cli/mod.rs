//! CLI for memstack
//!
//! Provides command-line parsing for the memstack binary: stack lifecycle
//! commands wrapping docker compose, health probing, and direct memory
//! operations against the REST API. Uses clap for argument parsing and
//! owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// memstack - memory stack operations and client CLI
///
/// Drives a self-hosted vector + graph memory service: scaffolds the
/// container stack, starts and stops it, probes its health, and talks to
/// its REST API.
#[derive(Parser, Debug)]
#[command(
    name = "memstack",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Operations and client CLI for a self-hosted memory service",
    long_about = "Drives a self-hosted vector + graph memory service: scaffolds the\n\
                  container stack (graph store, relational store with vector extension,\n\
                  prebuilt API server), starts and stops it, probes its health, and\n\
                  performs memory operations against its REST API.",
    after_help = "EXAMPLES:\n    \
                  memstack init                         # Scaffold memstack.toml, docker-compose.yml, .env.example\n    \
                  memstack up                           # Start the container stack\n    \
                  memstack status                       # Probe every service endpoint\n    \
                  memstack memory search -u alice food  # Retrieve memories about food\n    \
                  memstack memory list -u alice --json  # Dump a user's memories as JSON"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to memstack.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold the stack configuration files
    ///
    /// Creates memstack.toml, docker-compose.yml, and .env.example in the
    /// target directory.
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },

    /// Start the container stack (docker compose up -d)
    Up,

    /// Stop and remove the container stack (docker compose down)
    Down,

    /// Show container logs
    Logs {
        /// Limit to one service (graph, postgres, api)
        service: Option<String>,

        /// Follow log output
        #[arg(short, long)]
        follow: bool,
    },

    /// Show container status (docker compose ps)
    Ps,

    /// Probe every service endpoint and report up/down
    Status,

    /// Show the effective configuration (secrets redacted)
    Config {
        /// Validate the configuration and exit
        #[arg(long)]
        validate: bool,
    },

    /// Operate on stored memories via the REST API
    Memory {
        #[command(subcommand)]
        command: MemoryCommands,

        /// Emit raw JSON instead of formatted output
        #[arg(long, global = true)]
        json: bool,
    },
}

/// Memory operation subcommands
#[derive(Subcommand, Debug)]
pub enum MemoryCommands {
    /// Submit text for memory extraction (as a single user turn)
    Add {
        /// User the memory belongs to
        #[arg(short, long)]
        user: String,

        /// Text to extract memories from
        text: String,
    },

    /// Search memories relevant to a query
    Search {
        /// User whose memories to search
        #[arg(short, long)]
        user: String,

        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List all memories for a user
    List {
        /// User whose memories to list
        #[arg(short, long)]
        user: String,
    },

    /// Fetch one memory by id
    Get {
        /// Memory id
        id: String,
    },

    /// Replace the text of one memory
    Update {
        /// Memory id
        id: String,

        /// New memory text
        data: String,
    },

    /// Delete one memory
    Delete {
        /// Memory id
        id: String,
    },

    /// Delete every memory for a user
    DeleteAll {
        /// User whose memories to delete
        #[arg(short, long)]
        user: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
