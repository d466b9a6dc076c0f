//! Process exit codes.

use crate::error_handling::{CheckError, InitializationError, RequestError};

/// Outcome classes of one invocation, each with its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum ExitCode {
    /// The request succeeded and every assertion passed.
    Success,
    /// Invalid host mapping, invalid pattern, or no assertions.
    ConfigError,
    /// The request could not be constructed from the given input.
    InvalidRequest,
    /// No response was received.
    TransportFailure,
    /// A response was received and at least one assertion failed.
    AssertionFailure,
    /// Command-line usage or initialization error.
    UsageError,
}

impl ExitCode {
    /// Numeric process exit code.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::ConfigError => 71,
            ExitCode::InvalidRequest => 91,
            ExitCode::TransportFailure => 93,
            ExitCode::AssertionFailure => 95,
            ExitCode::UsageError => 103,
        }
    }
}

impl From<&CheckError> for ExitCode {
    fn from(err: &CheckError) -> Self {
        match err {
            CheckError::Initialization(_) => ExitCode::UsageError,
            CheckError::Config(_) => ExitCode::ConfigError,
            CheckError::Transport(_) => ExitCode::TransportFailure,
        }
    }
}

impl From<&RequestError> for ExitCode {
    fn from(_: &RequestError) -> Self {
        ExitCode::InvalidRequest
    }
}

impl From<&InitializationError> for ExitCode {
    fn from(_: &InitializationError) -> Self {
        ExitCode::UsageError
    }
}
