//! CLI adapter.
//!
//! This module turns parsed command-line options into the library's typed
//! inputs (request descriptor, assertion list) and provides the progress
//! logging and Ctrl-C handling used by the binary.

pub mod assertions;
pub mod logging;
pub mod request;
pub mod shutdown;

// Re-export public API
pub use assertions::{build_assertions, parse_header_assertions};
pub use logging::{log_host_mappings, log_outcome, log_request, log_response};
pub use request::build_request;
pub use shutdown::cancel_on_ctrl_c;
