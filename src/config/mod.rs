//! Configuration: defaults, library configuration and the CLI definition.

mod cli;
mod constants;
mod types;

pub use cli::{BlacklistAction, Cli, Command, GlobalArgs, KeywordAction};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
