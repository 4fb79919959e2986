//! riftctl - terminal client for the Riftscope gateway.

use std::io::{self, IsTerminal, Write};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use riftscope_client::{AgentClient, Phase};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Riftscope command-line client.",
    propagate_version = true
)]
struct Cli {
    /// Gateway base URL.
    #[arg(
        long,
        global = true,
        env = "RIFTSCOPE_GATEWAY_URL",
        default_value = "http://localhost:3100"
    )]
    gateway: String,

    /// Emit raw JSON snapshots instead of formatted output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask an agent for an analysis and stream the reply.
    Ask {
        /// Logical agent identifier (e.g. annual-summary).
        agent: String,
        /// The question to send.
        question: String,
    },
    /// List the agents the gateway can route to.
    Agents,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Ask { agent, question } => handle_ask(&cli.gateway, &agent, &question, cli.json).await,
        Command::Agents => handle_agents(&cli.gateway, cli.json).await,
    }
}

async fn handle_ask(gateway: &str, agent: &str, question: &str, json_output: bool) -> Result<()> {
    let mut client = AgentClient::new(gateway);
    let handle = client.start(agent, json!({ "query": question }));
    let mut updates = handle.updates();

    let mut last_status = String::new();
    while updates.changed().await.is_ok() {
        let view = updates.borrow_and_update().clone();

        if json_output {
            println!("{}", serde_json::to_string(&view)?);
            continue;
        }

        if view.live_status != last_status {
            if !last_status.is_empty() && view.live_status.starts_with(&last_status) {
                // Growing buffer: print only the new tail for the
                // typing effect.
                print!("{}", &view.live_status[last_status.len()..]);
            } else {
                if !last_status.is_empty() {
                    println!();
                }
                if io::stdout().is_terminal() && view.phase == Phase::Active {
                    print!("\x1b[2m{}\x1b[0m", view.live_status); // Dim text
                } else {
                    print!("{}", view.live_status);
                }
            }
            let _ = io::stdout().flush();
            last_status = view.live_status;
        }
    }

    let final_view = handle.wait().await;
    if !json_output {
        println!();
    }

    match final_view.phase {
        // The reply was already streamed to the terminal as it grew.
        Phase::Finished => Ok(()),
        Phase::Failed => bail!("{}", final_view.live_status),
        // Cancelled or never completed; nothing to print.
        _ => Ok(()),
    }
}

async fn handle_agents(gateway: &str, json_output: bool) -> Result<()> {
    let url = format!("{}/api/agents", gateway.trim_end_matches('/'));
    let response = reqwest::get(&url).await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("Request failed ({}): {}", status, body);
    }

    let agents: serde_json::Value = response.json().await?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&agents)?);
    } else if let Some(entries) = agents.as_array() {
        for entry in entries {
            println!(
                "{:<20} {:<32} {}s",
                entry["id"].as_str().unwrap_or("?"),
                entry["upstream_path"].as_str().unwrap_or("?"),
                entry["timeout_secs"].as_u64().unwrap_or(0),
            );
        }
    }
    Ok(())
}
