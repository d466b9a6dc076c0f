//! http_assert library: one HTTP request, checked against a list of assertions
//!
//! This library performs a single HTTP/1.1 request (optionally rerouted to
//! another address through host mappings, never following redirects), captures
//! the complete response and evaluates every assertion against it. When any
//! assertion fails, a diagnostic with the raw request and response is rendered.
//!
//! # Example
//!
//! ```no_run
//! use http_assert::{run_check, Assertion, CheckOutcome, Config, RequestDescriptor};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let request = RequestDescriptor::new("GET", "https://example.com/healthz")?;
//! let assertions = vec![Assertion::StatusOk, Assertion::header_present("Content-Type")];
//!
//! match run_check(&config, &request, &assertions, &CancellationToken::new()).await? {
//!     CheckOutcome::Passed { .. } => println!("healthy"),
//!     CheckOutcome::Failed { report, .. } => eprintln!("{report}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod assertions;
pub mod config;
mod error_handling;
pub mod fetch;
pub mod host_mapping;
pub mod initialization;
pub mod report;

// Re-export public API
pub use assertions::{run_assertions, Assertion, AssertionFailure, FailureSet};
pub use config::{AssertionFlags, Config, LogFormat, LogLevel, Opt};
pub use error_handling::{
    CheckError, ConfigError, ExitCode, HostMappingError, InitializationError, RequestError,
    TransportError, TransportErrorKind,
};
pub use fetch::{CapturedResponse, Dispatcher, PreparedRequest, RequestDescriptor};
pub use host_mapping::{parse_host_mappings, DialResolver, HostMapping, HostMappings};
pub use report::{render_failure_report, render_transport_failure};
pub use run::{run_check, CheckOutcome};

// Internal run module (validate, dispatch, assert)
mod run {
    use std::time::Instant;

    use tokio_util::sync::CancellationToken;

    use crate::app::{log_host_mappings, log_outcome, log_request, log_response};
    use crate::assertions::{run_assertions, Assertion, FailureSet};
    use crate::config::Config;
    use crate::error_handling::{CheckError, ConfigError, ExitCode};
    use crate::fetch::{CapturedResponse, Dispatcher, RequestDescriptor};
    use crate::report::render_failure_report;

    /// Result of a check that received a response.
    #[derive(Debug)]
    pub enum CheckOutcome {
        /// Every assertion passed.
        Passed {
            /// The captured response
            response: CapturedResponse,
        },
        /// At least one assertion failed.
        Failed {
            /// The captured response
            response: CapturedResponse,
            /// Failures in assertion order, never empty
            failures: FailureSet,
            /// Rendered diagnostic (failures, raw request, raw response)
            report: String,
        },
    }

    impl CheckOutcome {
        /// True when every assertion passed.
        pub fn is_passed(&self) -> bool {
            matches!(self, CheckOutcome::Passed { .. })
        }

        /// Process exit code for this outcome.
        pub fn exit_code(&self) -> ExitCode {
            if self.is_passed() {
                ExitCode::Success
            } else {
                ExitCode::AssertionFailure
            }
        }

        /// The captured response.
        pub fn response(&self) -> &CapturedResponse {
            match self {
                CheckOutcome::Passed { response } | CheckOutcome::Failed { response, .. } => {
                    response
                }
            }
        }
    }

    /// Runs one check: sends the request and evaluates every assertion.
    ///
    /// An empty assertion list is rejected before any network activity.
    /// Assertion failures are not errors: they come back as
    /// `CheckOutcome::Failed` with the rendered diagnostic.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::Config` for an empty assertion list,
    /// `CheckError::Initialization` if TLS cannot be set up, and
    /// `CheckError::Transport` when no response was received.
    pub async fn run_check(
        config: &Config,
        request: &RequestDescriptor,
        assertions: &[Assertion],
        cancel: &CancellationToken,
    ) -> Result<CheckOutcome, CheckError> {
        if assertions.is_empty() {
            return Err(ConfigError::NoAssertions.into());
        }

        log_host_mappings(&config.host_mappings);
        let dispatcher = Dispatcher::new(config)?;
        let prepared = request.prepare(&config.user_agent);

        let started_at = Instant::now();
        log_request(&prepared);
        let response = match dispatcher.dispatch(&prepared, cancel).await {
            Ok(response) => response,
            Err(e) => {
                log_outcome(false, started_at.elapsed());
                return Err(e.into());
            }
        };
        log_response(&response);

        let failures = run_assertions(&response, assertions);
        log_outcome(failures.is_empty(), started_at.elapsed());

        if failures.is_empty() {
            return Ok(CheckOutcome::Passed { response });
        }
        let report = render_failure_report(&prepared, &response, &failures);
        Ok(CheckOutcome::Failed {
            response,
            failures,
            report,
        })
    }
}
