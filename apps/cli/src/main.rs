//! Entry point for the `bistro` till.
//!
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Loads configuration (file, then `BISTRO_*` environment)
//! 4. Opens the database and menu store
//! 5. Runs the requested command

use anyhow::Context;
use clap::Parser;

use bistro_cli::cli::Cli;
use bistro_cli::{commands, init_tracing, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = AppConfig::load(cli.config.clone()).context("failed to load configuration")?;
    let state = AppState::open(config)
        .await
        .context("failed to open the database")?;

    let mut stdout = std::io::stdout().lock();
    let result = commands::dispatch(&state, cli.command, &mut stdout).await;

    state.db.close().await;
    result
}
