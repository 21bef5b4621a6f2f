//! Command-line interface definition.
//!
//! Global options map onto [`Config`]; each subcommand is one moderator
//! workflow. Every global option can also be set through the environment
//! (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CACHE_DIR, DEFAULT_CHECKO_BASE_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::config::types::{Config, LogFormat, LogLevel};
use crate::domain::GroupSort;
use crate::models::{ExtractionKind, SearchSource};

/// Moderator toolkit for supplier sourcing.
///
/// # Examples
///
/// ```bash
/// # Grouped domains of a run, blacklist applied
/// supplier_desk domains 42
///
/// # Registry snapshot and risk of a company
/// CHECKO_API_KEY=... supplier_desk score 7707083893
///
/// # INN extraction for a run, then supplier upsert
/// supplier_desk extract inn 42 --autosave
/// ```
#[derive(Debug, Parser)]
#[command(name = "supplier_desk", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Moderation backend base URL
    #[arg(long, env = "SUPPLIER_DESK_API_URL", default_value = DEFAULT_API_BASE_URL, global = true)]
    pub api_url: String,

    /// Checko API key (required by `score` and registry enrichment)
    #[arg(long, env = "CHECKO_API_KEY", hide_env_values = true, global = true)]
    pub checko_api_key: Option<String>,

    /// Checko API base URL
    #[arg(long, env = "CHECKO_API_URL", default_value = DEFAULT_CHECKO_BASE_URL, global = true)]
    pub checko_url: String,

    /// Directory of the session cache
    #[arg(long, env = "SUPPLIER_DESK_CACHE_DIR", default_value = DEFAULT_CACHE_DIR, global = true)]
    pub cache_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,
}

impl GlobalArgs {
    /// Library configuration for these options.
    pub fn to_config(&self) -> Config {
        Config {
            api_base_url: self.api_url.clone(),
            checko_api_key: self
                .checko_api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            checko_base_url: self.checko_url.clone(),
            cache_dir: self.cache_dir.clone(),
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent.clone(),
            log_level: self.log_level,
            log_format: self.log_format,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grouped, blacklist-filtered domains of a parsing run
    Domains {
        /// Parsing run id
        run_id: String,

        /// Group order
        #[arg(long, value_enum, default_value_t = GroupSort::UrlCountDesc)]
        sort: GroupSort,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Registry snapshot, reliability score and verdict for an INN
    Score {
        /// 10 or 12 digit INN
        inn: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage the domain blacklist
    Blacklist {
        #[command(subcommand)]
        action: BlacklistAction,
    },

    /// Manage the saved search keywords
    Keywords {
        #[command(subcommand)]
        action: KeywordAction,
    },

    /// Recent parsing runs
    Runs {
        /// Most recent runs to show
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Stored supplier with a risk report from its saved registry data
    Supplier {
        id: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start a parsing run for a keyword
    Parse {
        keyword: String,

        /// Result pages per engine
        #[arg(long)]
        depth: Option<u32>,

        /// Restrict the run to one engine
        #[arg(long, value_enum)]
        source: Option<SearchSource>,

        /// Poll the run until it finishes
        #[arg(long)]
        wait: bool,
    },

    /// Run a batch extraction over the domains of a parsing run
    Extract {
        /// Extractor
        #[arg(value_enum)]
        kind: ExtractionKind,

        /// Parsing run id
        run_id: String,

        /// Create or update suppliers from the results
        #[arg(long)]
        autosave: bool,

        /// Start a new job even if one is recorded for this run
        #[arg(long)]
        restart: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum BlacklistAction {
    /// List blacklisted domains
    List,

    /// Blacklist a domain (reduced to its root domain)
    Add {
        domain: String,

        #[arg(long)]
        reason: Option<String>,

        /// Run the domain was found in
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Remove a domain from the blacklist
    Remove { domain: String },
}

#[derive(Debug, Subcommand)]
pub enum KeywordAction {
    /// List saved keywords
    List,

    /// Save a keyword
    Add { keyword: String },

    /// Delete a keyword by id
    Remove { id: i64 },
}
