//! `env_logger` setup for the CLI and for embedders.

use std::io::{self, Write};

use chrono::{Local, SecondsFormat, Utc};
use colored::{ColoredString, Colorize};
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies whose debug output drowns our own.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("wiremock", LevelFilter::Warn),
];

/// Installs the global logger.
///
/// `RUST_LOG` directives are read first and `level` is applied on top, so
/// `--log-level` always wins for this crate. `Plain` prints
/// `HH:MM:SS LEVEL target message` with colors; `Json` prints one object per
/// line with `ts`, `level`, `target` and `msg`.
///
/// # Errors
///
/// `InitializationError::LoggerError` when a global logger is already set.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in QUIET_MODULES {
        builder.filter_module(module, (*cap).min(level));
    }
    builder.filter_module("supplier_desk", level);

    match format {
        LogFormat::Json => builder.format(json_line),
        LogFormat::Plain => builder.format(plain_line),
    };

    builder.try_init()?;
    Ok(())
}

fn json_line(buf: &mut Formatter, record: &Record<'_>) -> io::Result<()> {
    let line = serde_json::json!({
        "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    });
    writeln!(buf, "{line}")
}

fn level_label(level: Level) -> ColoredString {
    let label = format!("{:<5}", level.as_str());
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

fn plain_line(buf: &mut Formatter, record: &Record<'_>) -> io::Result<()> {
    writeln!(
        buf,
        "{} {} {} {}",
        Local::now().format("%H:%M:%S").to_string().dimmed(),
        level_label(record.level()),
        record.target().cyan(),
        record.args()
    )
}
