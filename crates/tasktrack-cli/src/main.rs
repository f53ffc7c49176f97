use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasktrack_cli::{commands, Cli, Settings};
use tasktrack_db::TaskRepository;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables, before the filter reads RUST_LOG
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktrack=info,tasktrack_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = Some(url);
    }
    let db_config = settings.db_config().context("Invalid database settings")?;
    tracing::debug!(?db_config, "Loaded settings");

    let repo = TaskRepository::connect(&db_config)
        .await
        .context("Unable to connect to task store")?;

    let signal = interrupt_signal(cli.timeout_secs.map(Duration::from_secs));
    let mut stdout = std::io::stdout();
    let result = commands::execute(cli.command, &repo, signal, cli.json, &mut stdout).await;

    repo.close().await;
    result
}

/// Completes on Ctrl-C, or when `timeout` elapses if one is given.
async fn interrupt_signal(timeout: Option<Duration>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Interrupted");
    };

    match timeout {
        Some(timeout) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = tokio::time::sleep(timeout) => {
                    tracing::warn!("Timed out after {:?}", timeout);
                }
            }
        }
        None => ctrl_c.await,
    }
}
