//! Request descriptor from CLI options.

use crate::config::Opt;
use crate::error_handling::RequestError;
use crate::fetch::RequestDescriptor;

/// Builds the request from `-X`, `-H`, `-d` and the URL.
///
/// # Errors
///
/// Returns a `RequestError` for an invalid method, URL or header line.
pub fn build_request(opt: &Opt) -> Result<RequestDescriptor, RequestError> {
    let mut request = RequestDescriptor::new(&opt.method, &opt.url)?;
    for line in &opt.headers {
        request = request.with_header_line(line)?;
    }
    if let Some(data) = &opt.data {
        request = request.with_body(data.clone());
    }
    Ok(request)
}
