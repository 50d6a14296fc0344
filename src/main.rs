//! memstack CLI entry point
//!
//! Dispatches stack lifecycle commands (init/up/down/logs/ps/status) and
//! memory operations against the REST API. All of the logic lives in the
//! library; this binary wires configuration, logging, and output together.

use anyhow::Context;
use memstack::cli::output::Output;
use memstack::cli::{self, Cli, Commands, MemoryCommands};
use memstack::client::{MemoryClient, MemoryStore};
use memstack::stack::{ComposeRunner, StackStatus};
use memstack::types::{ConversationTurn, MemoryRecord};
use memstack::utils::config::StackConfig;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    let default_filter = if cli.verbose {
        "memstack=debug"
    } else {
        "memstack=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { path, force } => {
            match cli::init::run(cli::init::InitConfig { path, force }, output) {
                cli::init::InitResult::Success => Ok(()),
                cli::init::InitResult::AlreadyExists => Ok(()),
                cli::init::InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
            }
        }

        Commands::Up => {
            compose()?.up().await?;
            output.success("Stack started");
            output.hint("Run 'memstack status' to verify every service is up");
            Ok(())
        }

        Commands::Down => {
            compose()?.down().await?;
            output.success("Stack stopped");
            Ok(())
        }

        Commands::Logs { service, follow } => {
            compose()?.logs(service.as_deref(), follow).await?;
            Ok(())
        }

        Commands::Ps => {
            compose()?.ps().await?;
            Ok(())
        }

        Commands::Status => {
            let config = load_config(&cli.config)?;
            let client = MemoryClient::from_config(&config)?;

            output.header("Stack status");
            let status = StackStatus::check(&config, &client).await;
            for service in &status.services {
                output.status_row(&service.name, &service.endpoint, service.up);
            }

            if status.all_up() {
                output.success("All services answering");
            } else {
                output.warning("Some services are down");
                output.hint("Run 'memstack logs <service>' to inspect");
            }
            Ok(())
        }

        Commands::Config { validate } => {
            let config = load_config(&cli.config)?;
            config
                .validate()
                .context("configuration failed validation")?;

            if validate {
                output.success("Configuration is valid");
                return Ok(());
            }

            let mut redacted = config.clone();
            redacted.graph.password = "<redacted>".to_string();
            redacted.relational.password = "<redacted>".to_string();
            println!("{}", toml::to_string_pretty(&redacted)?);
            Ok(())
        }

        Commands::Memory { command, json } => {
            let config = load_config(&cli.config)?;
            let client = MemoryClient::from_config(&config)?;
            run_memory(command, json, &client, output).await
        }
    }
}

async fn run_memory(
    command: MemoryCommands,
    json: bool,
    client: &MemoryClient,
    output: &Output,
) -> anyhow::Result<()> {
    match command {
        MemoryCommands::Add { user, text } => {
            let turns = vec![ConversationTurn::user(text)];
            let extracted = client.add(turns, &user, None).await?;
            if json {
                print_json(&extracted)?;
            } else {
                output.success(&format!("Extracted {} memories", extracted.len()));
                print_records(&extracted, output);
            }
            Ok(())
        }

        MemoryCommands::Search { user, query, limit } => {
            let hits = client.search(&query, &user, limit).await?;
            if json {
                print_json(&hits)?;
            } else if hits.is_empty() {
                output.info("No relevant memories");
            } else {
                print_records(&hits, output);
            }
            Ok(())
        }

        MemoryCommands::List { user } => {
            let records = client.list(&user).await?;
            if json {
                print_json(&records)?;
            } else if records.is_empty() {
                output.info(&format!("No memories stored for {}", user));
            } else {
                print_records(&records, output);
            }
            Ok(())
        }

        MemoryCommands::Get { id } => {
            let record = client.get(&id).await?;
            if json {
                print_json(&record)?;
            } else {
                print_records(std::slice::from_ref(&record), output);
            }
            Ok(())
        }

        MemoryCommands::Update { id, data } => {
            let record = client.update(&id, &data).await?;
            if json {
                print_json(&record)?;
            } else {
                output.success(&format!("Updated memory {}", record.id));
            }
            Ok(())
        }

        MemoryCommands::Delete { id } => {
            client.delete(&id).await?;
            output.success(&format!("Deleted memory {}", id));
            Ok(())
        }

        MemoryCommands::DeleteAll { user, yes } => {
            if !yes && !confirm(&format!("Delete ALL memories for {}?", user))? {
                output.info("Aborted");
                return Ok(());
            }
            client.delete_all(&user).await?;
            output.success(&format!("Deleted all memories for {}", user));
            Ok(())
        }
    }
}

fn compose() -> anyhow::Result<ComposeRunner> {
    let file = "docker-compose.yml";
    if !std::path::Path::new(file).exists() {
        anyhow::bail!("no docker-compose.yml here - run 'memstack init' first");
    }
    Ok(ComposeRunner::new(file))
}

fn load_config(path: &Option<std::path::PathBuf>) -> anyhow::Result<StackConfig> {
    let config = StackConfig::load(path.as_deref()).context("failed to load configuration")?;
    Ok(config)
}

fn print_records(records: &[MemoryRecord], output: &Output) {
    for record in records {
        match record.score {
            Some(score) => output.info(&format!("[{}] ({:.2}) {}", record.id, score, record.memory)),
            None => output.info(&format!("[{}] {}", record.id, record.memory)),
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
