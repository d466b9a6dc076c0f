//! Error type definitions.
//!
//! This module defines the error taxonomy of a check: configuration errors
//! (detected before any network activity), request construction errors, and
//! transport errors (anything that prevents a response from being received).

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS client initialization error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// A malformed `srchost:srcport=dsthost[:dstport]` entry.
///
/// Each variant carries the full raw entry so the message names the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostMappingError {
    /// The entry has no `=` or nothing before it.
    #[error("value {value:?} has no separator, =")]
    NoSeparator {
        /// Raw entry
        value: String,
    },

    /// The left side has no `:port`.
    #[error("value {value:?} has no src port {src:?}")]
    NoSrcPort {
        /// Raw entry
        value: String,
        /// Left side of the entry
        src: String,
    },

    /// The left side port is not an integer.
    #[error("value {value:?} has invalid src port {port:?}")]
    InvalidSrcPort {
        /// Raw entry
        value: String,
        /// Text after the colon
        port: String,
    },

    /// The right side has a colon but the port after it is not an integer.
    #[error("value {value:?} has invalid dst port {port:?}")]
    InvalidDstPort {
        /// Raw entry
        value: String,
        /// Text after the colon
        port: String,
    },
}

/// Configuration errors, always fatal and always raised before dialing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A `--maphost` entry could not be parsed.
    #[error("invalid host mapping: {0}")]
    HostMapping(#[from] HostMappingError),

    /// A regular expression supplied for an assertion does not compile.
    #[error("{assertion}: invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Name of the assertion the pattern belongs to
        assertion: String,
        /// The pattern as supplied
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },

    /// The check has nothing to verify.
    #[error("no assertions defined")]
    NoAssertions,
}

/// The request descriptor could not be built from user input.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The method is not a valid HTTP token.
    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    /// The target URL does not parse.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// URL as supplied
        url: String,
        /// Parse error
        #[source]
        source: url::ParseError,
    },

    /// Only `http` and `https` can be dispatched.
    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),

    /// The URL has no host to dial.
    #[error("URL {0:?} has no host")]
    MissingHost(String),

    /// A request header has an invalid name or value.
    #[error("invalid header {0:?}")]
    InvalidHeader(String),
}

/// What went wrong on the wire.
#[derive(Error, Debug)]
pub enum TransportErrorKind {
    /// The dial target did not resolve to any address.
    #[error("cannot resolve {target}: {source}")]
    Resolve {
        /// Dial target (`host:port`) after host mapping
        target: String,
        /// Resolver error
        #[source]
        source: std::io::Error,
    },

    /// Every resolved address refused or failed the connection.
    #[error("cannot connect to {target}: {source}")]
    Connect {
        /// Dial target (`host:port`) after host mapping
        target: String,
        /// Last connect error
        #[source]
        source: std::io::Error,
    },

    /// No connection was established within the connect timeout.
    #[error("TCP connection timeout for {target} ({secs}s)")]
    ConnectTimeout {
        /// Dial target (`host:port`) after host mapping
        target: String,
        /// Timeout in seconds
        secs: u64,
    },

    /// The URL host is not usable as a TLS server name.
    #[error("invalid TLS server name {0:?}")]
    InvalidServerName(String),

    /// The TLS handshake failed (includes certificate verification).
    #[error("TLS handshake failed for {server_name}: {source}")]
    TlsHandshake {
        /// Server name sent in SNI
        server_name: String,
        /// Handshake error
        #[source]
        source: std::io::Error,
    },

    /// The TLS handshake did not finish within its timeout.
    #[error("TLS handshake timeout for {server_name} ({secs}s)")]
    TlsHandshakeTimeout {
        /// Server name sent in SNI
        server_name: String,
        /// Timeout in seconds
        secs: u64,
    },

    /// HTTP protocol error while sending the request or reading the response.
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    /// The request could not be turned into an HTTP message.
    #[error("cannot build HTTP request: {0}")]
    Build(#[from] hyper::http::Error),

    /// The full round trip exceeded the overall request timeout.
    #[error("request timeout ({secs}s)")]
    Timeout {
        /// Timeout in seconds
        secs: u64,
    },

    /// The invocation was cancelled while the request was in flight.
    #[error("request cancelled")]
    Cancelled,
}

/// A failure before any response was received. Never retried.
#[derive(Error, Debug)]
#[error("failed to send request {request}: {kind}")]
pub struct TransportError {
    /// The attempted request, as `METHOD URL`
    pub request: String,
    /// Underlying cause
    #[source]
    pub kind: TransportErrorKind,
}

/// Errors that abort a check before assertions run.
#[derive(Error, Debug)]
pub enum CheckError {
    /// A process-wide resource (TLS configuration) could not be set up.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// Invalid configuration, detected before dialing.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No response was obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
