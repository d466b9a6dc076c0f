//! Progress logging utilities.

use std::time::Duration;

use log::{debug, info};

use crate::fetch::{CapturedResponse, PreparedRequest};
use crate::host_mapping::HostMappings;

/// Logs the configured host mappings.
pub fn log_host_mappings(mappings: &HostMappings) {
    if mappings.is_empty() {
        return;
    }
    debug!("Host mappings:");
    for m in mappings {
        debug!("- {:?} -> {:?}", m.src, m.dst);
    }
}

/// `[.] HTTP/1.1 GET <url>`
pub fn log_request(request: &PreparedRequest) {
    info!(
        "[.] {:?} {} {}",
        request.version(),
        request.method(),
        request.url()
    );
}

/// `[:] HTTP/1.1 <status>`
pub fn log_response(response: &CapturedResponse) {
    info!("[:] {:?} {}", response.version(), response.status_text());
}

/// `[+] PASSED <elapsed>` or `[-] FAILED <elapsed>`.
pub fn log_outcome(passed: bool, elapsed: Duration) {
    if passed {
        info!("[+] PASSED {elapsed:?}");
    } else {
        info!("[-] FAILED {elapsed:?}");
    }
}
