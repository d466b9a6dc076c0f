//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `http_assert` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Ctrl-C cancellation
//! - Diagnostics on stderr and the process exit code
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use http_assert::app::{build_assertions, build_request, cancel_on_ctrl_c};
use http_assert::initialization::init_logger_with;
use http_assert::{
    render_transport_failure, run_check, CheckError, CheckOutcome, Config, ExitCode, Opt,
};

#[tokio::main]
async fn main() {
    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        // --help and --version print to stdout and exit 0
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(ExitCode::UsageError.code());
        }
    };

    let exit_code = match run(opt).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("http-assert: {e:#}");
            ExitCode::UsageError
        }
    };
    process::exit(exit_code.code());
}

async fn run(opt: Opt) -> Result<ExitCode> {
    init_logger_with(opt.effective_log_level(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = match Config::from_opt(&opt) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("http-assert: {e}");
            return Ok(ExitCode::ConfigError);
        }
    };
    let assertions = match build_assertions(&opt.assertions) {
        Ok(assertions) => assertions,
        Err(e) => {
            eprintln!("http-assert: {e}");
            return Ok(ExitCode::ConfigError);
        }
    };
    let request = match build_request(&opt) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("http-assert: {e}");
            return Ok(ExitCode::from(&e));
        }
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());
    let result = run_check(&config, &request, &assertions, &cancel).await;
    cancel.cancel();
    let _ = ctrl_c.await;

    match result {
        Ok(outcome) => {
            if let CheckOutcome::Failed { report, .. } = &outcome {
                eprint!("\n{report}");
            }
            Ok(outcome.exit_code())
        }
        Err(CheckError::Transport(e)) => {
            let prepared = request.prepare(&config.user_agent);
            eprint!("\n{}", render_transport_failure(&prepared, &e));
            Ok(ExitCode::TransportFailure)
        }
        Err(e) => {
            eprintln!("http-assert: {e}");
            Ok(ExitCode::from(&e))
        }
    }
}
