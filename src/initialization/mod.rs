//! Application initialization and resource setup.
//!
//! This module provides functions to initialize process-wide resources:
//! - Logger (plain or JSON, to stderr)
//! - TLS client configuration (ring crypto provider, verification on/off)
//!
//! All initialization functions return `InitializationError` on failure.

mod logger;
mod tls;

// Re-export public API
pub use logger::init_logger_with;
pub use tls::init_tls_config;
