//! The captured HTTP response.

use bytes::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::http::response::Parts;
use hyper::{StatusCode, Version};

/// A fully read response: status line, headers and the whole body.
///
/// The status is kept as a raw integer so that codes outside the registered
/// range (and synthetic ones such as `0`) can still be reported.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    version: Version,
    status: u16,
    reason: String,
    headers: HeaderMap,
    body: Bytes,
}

impl CapturedResponse {
    /// Creates an HTTP/1.1 response with no headers and an empty body.
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            version: Version::HTTP_11,
            status,
            reason: reason.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub(crate) fn from_parts(parts: Parts, body: Bytes) -> Self {
        let reason = parts
            .extensions
            .get::<hyper::ext::ReasonPhrase>()
            .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned())
            .or_else(|| parts.status.canonical_reason().map(str::to_string))
            .unwrap_or_default();

        Self {
            version: parts.version,
            status: parts.status.as_u16(),
            reason,
            headers: parts.headers,
            body,
        }
    }

    /// Replaces all headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends one header value, keeping existing values of the same name.
    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Numeric status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Status code and reason phrase, e.g. `404 Not Found`.
    pub fn status_text(&self) -> String {
        if self.reason.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.reason)
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        StatusCode::from_u16(self.status).is_ok_and(|s| s.is_success())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// All values of a header, matched case-insensitively, or `None` when the
    /// header is absent. Non UTF-8 bytes are replaced.
    pub fn header_values(&self, name: &str) -> Option<Vec<String>> {
        let values: Vec<String> = self
            .headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }
}
