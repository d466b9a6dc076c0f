//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, display limits, etc.)
//! - CLI option types and parsing
//! - The library `Config` handed to the dispatcher

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{AssertionFlags, Config, LogFormat, LogLevel, Opt};
