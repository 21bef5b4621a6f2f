//! Moderator workflows behind the CLI subcommands.
//!
//! - `context` - clients, session cache, cache-first list loading
//! - `review` - grouped domains of a run, blacklist and keyword management
//! - `score` - registry snapshot or stored supplier with reliability score and verdict
//! - `jobs` - parsing runs and batch extraction jobs, supplier auto-save

mod context;
mod jobs;
mod review;
mod score;

use anyhow::Result;

pub use context::AppContext;

use crate::config::{Command, Config};

/// Runs one CLI command against the configured backend.
///
/// # Errors
///
/// Returns an error if a client cannot be built or a required backend or
/// registry call fails. Optional data (logs, enrichment) only logs warnings.
pub async fn run_command(config: Config, command: Command) -> Result<()> {
    let ctx = AppContext::new(config)?;
    match command {
        Command::Domains { run_id, sort, json } => {
            review::show_domains(&ctx, &run_id, sort, json).await
        }
        Command::Score { inn, json } => score::score(&ctx, &inn, json).await,
        Command::Blacklist { action } => review::blacklist(&ctx, action).await,
        Command::Keywords { action } => review::keywords(&ctx, action).await,
        Command::Runs { limit } => jobs::list_runs(&ctx, limit).await,
        Command::Supplier { id, json } => score::supplier(&ctx, id, json).await,
        Command::Parse {
            keyword,
            depth,
            source,
            wait,
        } => jobs::parse(&ctx, keyword, depth, source, wait).await,
        Command::Extract {
            kind,
            run_id,
            autosave,
            restart,
        } => jobs::extract(&ctx, kind, &run_id, autosave, restart).await,
    }
}
