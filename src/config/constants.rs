//! Configuration constants.
//!
//! This module defines the fixed operational parameters of the dispatcher and
//! the failure reporter: timeouts, display budgets and default header values.

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// TCP keep-alive probe interval in seconds
pub const TCP_KEEPALIVE_SECS: u64 = 20;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 10;
/// Overall per-request timeout in seconds.
///
/// Bounds the full round trip: dial, handshake, send, and the complete body read.
pub const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Default User-Agent sent when the caller does not provide one.
pub const DEFAULT_USER_AGENT: &str = concat!("http-assert/", env!("CARGO_PKG_VERSION"));

// Failure report limits
/// Maximum number of body bytes shown in a failure report.
/// Bytes past this budget are counted and reported as hidden.
pub const MAX_PAYLOAD_DISPLAY_BYTES: usize = 256;
