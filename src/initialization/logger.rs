//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.
//! All log output goes to stderr, next to the failure diagnostics.

use std::io::{IsTerminal, Write};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (colored level tags) and JSON formats for structured logging.
///
/// `level` is the default for every module. `hyper` and `rustls` are quieter
/// by default; `RUST_LOG` directives override those defaults, and `level`
/// always wins for this crate.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Progress lines and connection details
/// http-assert https://example.com/ --assert-ok --verbose
///
/// # Machine-readable logs
/// http-assert https://example.com/ --assert-ok --log-format json
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=rustls=debug http-assert https://example.com/ --assert-ok
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(std::io::stderr().is_terminal());

    let rust_log = std::env::var("RUST_LOG").ok();
    let mut builder = filtered_builder(level, rust_log.as_deref());

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string()
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    plain_line(record.level(), record.target(), &record.args().to_string())
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Filter order: CLI level, dependency defaults, `RUST_LOG`, then the CLI level
/// again for this crate. Later directives for the same module win.
fn filtered_builder(level: LevelFilter, rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(level);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Warn);
    if let Some(spec) = rust_log {
        builder.parse_filters(spec);
    }
    builder.filter_module("http_assert", level);

    builder
}

/// One JSON object per record.
fn json_line(ts_millis: i64, level: Level, target: &str, msg: &str) -> String {
    format!(
        "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
        ts_millis,
        level,
        target,
        serde_json::to_string(msg).unwrap_or_else(|_| "\"\"".into())
    )
}

/// Progress lines (`info`) are printed bare; everything else gets a level tag.
fn plain_line(level: Level, target: &str, msg: &str) -> String {
    let tag = match level {
        Level::Error => level.to_string().red(),
        Level::Warn => level.to_string().yellow(),
        Level::Info => return msg.to_string(),
        Level::Debug => level.to_string().blue(),
        Level::Trace => level.to_string().purple(),
    };
    format!("[{}] {}: {}", tag, target.cyan(), msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(1_700_000_000_000, Level::Info, "http_assert", "say \"hi\"\n");
        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(parsed["ts"], 1_700_000_000_000i64);
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["target"], "http_assert");
        assert_eq!(parsed["msg"], "say \"hi\"\n");
    }

    #[test]
    fn test_plain_line_info_is_bare() {
        colored::control::set_override(false);
        assert_eq!(
            plain_line(Level::Info, "http_assert", "[.] HTTP/1.1 GET http://x/"),
            "[.] HTTP/1.1 GET http://x/"
        );
        assert_eq!(
            plain_line(Level::Debug, "http_assert::fetch", "dialing"),
            "[DEBUG] http_assert::fetch: dialing"
        );
    }

    fn enabled(logger: &env_logger::Logger, level: Level, target: &str) -> bool {
        use log::Log;

        let metadata = log::Metadata::builder().level(level).target(target).build();
        logger.enabled(&metadata)
    }

    #[test]
    fn test_dependency_defaults() {
        let logger = filtered_builder(LevelFilter::Debug, None).build();
        assert!(enabled(&logger, Level::Debug, "http_assert::fetch"));
        assert!(!enabled(&logger, Level::Debug, "hyper::proto"));
        assert!(!enabled(&logger, Level::Info, "rustls::client"));
        assert!(enabled(&logger, Level::Warn, "rustls::client"));
    }

    #[test]
    fn test_rust_log_overrides_dependency_defaults() {
        let logger = filtered_builder(LevelFilter::Info, Some("rustls=debug")).build();
        assert!(enabled(&logger, Level::Debug, "rustls::client"));
        assert!(!enabled(&logger, Level::Debug, "http_assert"));
    }

    #[test]
    fn test_cli_level_wins_for_this_crate() {
        let logger = filtered_builder(LevelFilter::Error, Some("http_assert=trace")).build();
        assert!(!enabled(&logger, Level::Info, "http_assert::app"));
        assert!(enabled(&logger, Level::Error, "http_assert::app"));
    }

    #[test]
    fn test_init_logger_twice_fails_gracefully() {
        // env_logger can only be initialized once per process
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
