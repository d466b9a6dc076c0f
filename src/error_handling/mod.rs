//! Error handling.
//!
//! This module provides:
//! - Error type definitions for each failure class of a check
//! - Process exit codes derived from those classes
//!
//! Failures are categorized into:
//! - **Configuration errors**: bad host mappings, bad patterns, no assertions
//! - **Request errors**: the request descriptor cannot be built
//! - **Transport errors**: no response was received
//!
//! Assertion failures are not errors in this sense; they are collected into a
//! `FailureSet` (see `crate::assertions`).

mod exit;
mod types;

// Re-export public API
pub use exit::ExitCode;
pub use types::{
    CheckError, ConfigError, HostMappingError, InitializationError, RequestError, TransportError,
    TransportErrorKind,
};
