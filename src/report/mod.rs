//! Failure diagnostics.
//!
//! Renders the block printed when a check fails: the failure list, the request
//! exactly as it was sent and the response as it was received. Bodies are
//! rendered binary-safe and cut to `MAX_PAYLOAD_DISPLAY_BYTES`; the number of
//! hidden bytes is always stated.

mod payload;

use std::fmt::Write;

use crate::assertions::FailureSet;
use crate::config::MAX_PAYLOAD_DISPLAY_BYTES;
use crate::error_handling::TransportError;
use crate::fetch::{canonical_header_key, CapturedResponse, PreparedRequest};

pub use payload::{is_printable, print_payload};

/// Renders the full diagnostic for failed assertions.
pub fn render_failure_report(
    request: &PreparedRequest,
    response: &CapturedResponse,
    failures: &FailureSet,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} assertions failed:", failures.len());
    for failure in failures {
        let _ = writeln!(out, "- {failure}");
    }

    write_request_block(&mut out, request);
    out.push_str("\n\n");
    write_response(&mut out, response);
    out.push('\n');
    out
}

/// Renders the diagnostic for a request that never got a response.
pub fn render_transport_failure(request: &PreparedRequest, error: &TransportError) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{error}");
    write_request_block(&mut out, request);
    out.push('\n');
    out
}

fn write_request_block(out: &mut String, request: &PreparedRequest) {
    let _ = write!(
        out,
        "\nFAILED: {} {} ({:?})\n\n",
        request.method(),
        request.url(),
        request.version()
    );
    write_request(out, request);
}

/// Request line, headers and body, in send order.
pub fn write_request(out: &mut String, request: &PreparedRequest) {
    let _ = writeln!(
        out,
        "{} {} {:?}",
        request.method(),
        request.target(),
        request.version()
    );
    for (name, value) in request.headers() {
        let _ = writeln!(out, "{name}: {value}");
    }
    out.push('\n');
    write_body(out, request.body());
}

/// Status line, headers and body.
pub fn write_response(out: &mut String, response: &CapturedResponse) {
    let _ = writeln!(out, "{:?} {}", response.version(), response.status_text());
    for (name, value) in response.headers() {
        let _ = writeln!(
            out,
            "{}: {}",
            canonical_header_key(name.as_str()),
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    out.push('\n');
    write_body(out, response.body());
}

fn write_body(out: &mut String, body: &[u8]) {
    let cropped = print_payload(out, body, MAX_PAYLOAD_DISPLAY_BYTES);
    if cropped > 0 {
        let _ = write!(
            out,
            "\n\n  << Payload is cropped: {cropped} bytes are hidden >>"
        );
    }
}
