//! `supplier_desk` binary.
//!
//! Loads `.env`, parses the command line, installs the logger and hands the
//! command to [`supplier_desk::run_command`].

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use supplier_desk::config::Cli;
use supplier_desk::initialization::init_logger_with;
use supplier_desk::run_command;

#[tokio::main]
async fn main() -> Result<()> {
    // .env next to the working directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Some(env_path) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(".env")))
        {
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.global.to_config();

    init_logger_with(config.log_level.into(), config.log_format)
        .context("Failed to initialize logger")?;

    if let Err(e) = run_command(config, cli.command).await {
        eprintln!("supplier_desk error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
