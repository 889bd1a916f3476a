//! Quiesce CLI - quiesce command

use anyhow::Result;
use clap::Parser;
use cli_lib::{daemon, Cli, Settings};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(if settings.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    daemon::run(settings).await
}
