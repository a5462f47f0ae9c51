// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use indicator_engine::cli::{execute_command, Cli};
use indicator_engine::config::AppConfig;
use indicator_engine::utils::log_utils::init_logging;

fn main() -> Result<()> {
    // Initialize environment
    dotenv::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.logging)?;

    // Execute command
    execute_command(cli.command, &config)
}
