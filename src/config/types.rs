//! Runtime configuration shared by the CLI and library embedders.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use log::LevelFilter;

use crate::config::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CACHE_DIR, DEFAULT_CHECKO_BASE_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

/// Minimum severity written to the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Shape of log lines: colored text for terminals, JSON lines for collectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Backend endpoints, registry credentials, cache location and HTTP
/// settings. Built by the CLI from flags and environment variables.
///
/// # Examples
///
/// ```no_run
/// use supplier_desk::Config;
///
/// let config = Config {
///     api_base_url: "http://backend.internal:8000".to_string(),
///     checko_api_key: Some("secret".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the moderation backend
    pub api_base_url: String,

    /// Checko API key (registry lookups are disabled without it)
    pub checko_api_key: Option<String>,

    /// Base URL of the Checko API
    pub checko_base_url: String,

    /// Directory of the file-backed session cache
    pub cache_dir: PathBuf,

    /// Seconds before an outbound request is abandoned
    pub timeout_seconds: u64,

    /// Sent as `User-Agent` on backend and Checko calls
    pub user_agent: String,

    /// Lowest severity that reaches the log
    pub log_level: LogLevel,

    /// Plain terminal lines or JSON lines
    pub log_format: LogFormat,
}

impl Config {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            checko_api_key: None,
            checko_base_url: DEFAULT_CHECKO_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_maps_to_filter() {
        let pairs = [
            (LogLevel::Error, LevelFilter::Error),
            (LogLevel::Warn, LevelFilter::Warn),
            (LogLevel::Info, LevelFilter::Info),
            (LogLevel::Debug, LevelFilter::Debug),
            (LogLevel::Trace, LevelFilter::Trace),
        ];
        for (level, filter) in pairs {
            assert_eq!(LevelFilter::from(level), filter);
        }
    }

    #[test]
    fn test_default_config_points_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert!(config.checko_api_key.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("supplier_desk/"));
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_format, LogFormat::Plain);
    }
}
