mod config;
mod logging;
mod signals;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{AppConfig, CliOverrides};
use persona_service::infra::storage::connect;
use persona_service::PersonaServiceModule;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Persona Server - users, sessions, posts and personas over HTTP
#[derive(Parser)]
#[command(name = "persona-server")]
#[command(about = "Persona Server - users, sessions, posts and personas over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        if !path.is_file() {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
    }

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    });

    logging::init_logging(&config.logging)?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
        Commands::Migrate => migrate(&config).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.persona_service.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn open_module(config: &AppConfig) -> Result<PersonaServiceModule> {
    let db = connect(&config.database.dsn, config.database.max_connections).await?;
    PersonaServiceModule::init(db, config.persona_service.clone())
}

async fn migrate(config: &AppConfig) -> Result<()> {
    let module = open_module(config).await?;
    module.migrate().await?;
    println!("Migrations applied");
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Persona Server starting");

    let module = Arc::new(open_module(&config).await?);
    module.migrate().await?;

    let cancel = CancellationToken::new();

    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = signals::wait_for_shutdown().await {
            tracing::warn!(error = %e, "shutdown: signal waiter failed, falling back to ctrl_c()");
            let _ = tokio::signal::ctrl_c().await;
        }
        cancel_for_signals.cancel();
    });

    let sweeper = tokio::spawn(module.clone().serve(cancel.child_token()));

    let app = module.router().layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "HTTP server listening");

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server failed")?;

    // Server may also stop on its own; make sure the sweeper follows
    cancel.cancel();
    sweeper.await??;

    tracing::info!("Persona Server stopped");
    Ok(())
}
