//! Riftscope gateway server binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use riftscope::api::{AppState, create_router};
use riftscope::config::Settings;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Riftscope - gateway for AI-generated League analyses.",
    propagate_version = true
)]
struct Cli {
    /// Path to a riftscope.toml (optional; environment overrides it).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the gateway server.
    Serve {
        /// Override the configured bind host.
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port.
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,riftscope=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            serve(settings).await
        }
    }
}

async fn serve(settings: Settings) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .context("invalid bind address")?;

    info!(
        analysis_url = %settings.analysis_url,
        %addr,
        "Starting riftscope gateway"
    );

    let state = AppState::new(settings);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
