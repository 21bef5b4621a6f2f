//! Utility functions.
//!
//! This module provides:
//! - Currency formatting (whole rubles, compact scales)
//! - Date parsing and formatting for backend and registry dates

mod format;

pub use format::{format_compact_currency, format_currency, format_date, parse_date};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
