//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and the library configuration the dispatcher is built from.

use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_USER_AGENT, REQUEST_TIMEOUT_SECS, TCP_CONNECT_TIMEOUT_SECS, TCP_KEEPALIVE_SECS,
    TLS_HANDSHAKE_TIMEOUT_SECS,
};
use crate::error_handling::ConfigError;
use crate::host_mapping::{parse_host_mappings, HostMappings};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Assert a health endpoint answers 2xx
/// http-assert https://example.com/healthz --assert-ok
///
/// # Hit a specific backend while keeping Host and SNI intact
/// http-assert https://example.com/ --maphost example.com:443=10.0.0.7 \
///     --assert-header-eq 'Content-Type: text/html'
///
/// # Check a redirect without following it
/// http-assert http://example.com/ --assert-redirect-eq https://example.com/
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "http-assert",
    version,
    about = "Perform HTTP request and assert received HTTP response"
)]
pub struct Opt {
    /// URL to request
    pub url: String,

    /// Set method for HTTP request
    #[arg(short = 'X', long = "request", default_value = "GET")]
    pub method: String,

    /// Set header for HTTP request (`Name: value` or `Name`)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Send the specified data as the request body
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Provide a custom address for a specific host and port pair,
    /// e.g. <srchostname:srcport=dsthostname[:dstport]>
    #[arg(long, env = "HTTP_ASSERT_MAPHOST", value_delimiter = ',')]
    pub maphost: Vec<String>,

    /// Disable checking TLS certificates
    #[arg(short = 'k', long, env = "HTTP_ASSERT_INSECURE", value_parser = FalseyValueParser::new())]
    pub insecure: bool,

    /// Be verbose; log debug messages
    #[arg(short, long, env = "HTTP_ASSERT_VERBOSE", value_parser = FalseyValueParser::new())]
    pub verbose: bool,

    /// Be silent; log errors only
    #[arg(short, long, env = "HTTP_ASSERT_SILENT", value_parser = FalseyValueParser::new())]
    pub silent: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub assertions: AssertionFlags,
}

impl Opt {
    /// Effective log level: `--verbose` beats `--silent`, both beat `--log-level`.
    pub fn effective_log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.silent {
            log::LevelFilter::Error
        } else {
            self.log_level.clone().into()
        }
    }
}

/// Assertion flags, one field per assertion kind.
#[derive(Debug, Default, Args)]
pub struct AssertionFlags {
    /// Assert response is successful (2xx); `--assert-ok=false` asserts the opposite
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub assert_ok: Option<bool>,

    /// Assert response status equals the provided value
    #[arg(long)]
    pub assert_status: Option<u16>,

    /// Assert header matches the provided regexp (`Name: regexp`, or `Name` for presence)
    #[arg(long)]
    pub assert_header: Vec<String>,

    /// Assert header equals the provided value (`Name: value`, or `Name` for presence)
    #[arg(long)]
    pub assert_header_eq: Vec<String>,

    /// Assert header is missing
    #[arg(long)]
    pub assert_header_missing: Vec<String>,

    /// Assert body matches the provided regexp
    #[arg(long)]
    pub assert_body: Option<String>,

    /// Assert body equals the provided value
    #[arg(long)]
    pub assert_body_eq: Option<String>,

    /// Assert body is empty
    #[arg(long)]
    pub assert_body_empty: bool,

    /// Assert response redirects to a URL matching the provided regexp
    #[arg(long)]
    pub assert_redirect: Option<String>,

    /// Assert response redirects to the provided URL
    #[arg(long)]
    pub assert_redirect_eq: Option<String>,
}

/// Library configuration (no CLI dependencies).
///
/// Built once per invocation and handed to the dispatcher by reference.
///
/// # Examples
///
/// ```no_run
/// use http_assert::Config;
///
/// let config = Config {
///     insecure: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Disable TLS certificate verification
    pub insecure: bool,

    /// Dial-target overrides, first match wins
    pub host_mappings: HostMappings,

    /// TCP connection establishment timeout
    pub connect_timeout: Duration,

    /// TCP keep-alive probe interval
    pub keepalive: Duration,

    /// TLS handshake timeout
    pub tls_handshake_timeout: Duration,

    /// Timeout bounding the full round trip, body included
    pub request_timeout: Duration,

    /// User-Agent sent unless the request carries its own
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            insecure: false,
            host_mappings: HostMappings::default(),
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            keepalive: Duration::from_secs(TCP_KEEPALIVE_SECS),
            tls_handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Builds the library configuration from parsed CLI options.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HostMapping` if any `--maphost` entry is malformed.
    pub fn from_opt(opt: &Opt) -> Result<Self, ConfigError> {
        let host_mappings = parse_host_mappings(&opt.maphost)?;
        Ok(Self {
            insecure: opt.insecure,
            host_mappings,
            ..Default::default()
        })
    }
}
