//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain colored or JSON lines)
//! - HTTP client (timeout, User-Agent)
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
