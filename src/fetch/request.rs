//! HTTP request building and header-line parsing.
//!
//! A [`RequestDescriptor`] is what the user asked for; a [`PreparedRequest`] is
//! exactly what goes on the wire (defaults such as `Host` and `User-Agent`
//! filled in). The failure report renders the prepared request, so the dump
//! always matches the bytes that were sent.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Method, Version};
use url::{Position, Url};

use crate::error_handling::RequestError;

/// The request to perform, as described by the user. Immutable once built.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl RequestDescriptor {
    /// Creates a descriptor for `method url`.
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` when the method is not a valid token, the URL
    /// does not parse, its scheme is not `http`/`https`, or it has no host.
    pub fn new(method: &str, url: &str) -> Result<Self, RequestError> {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| RequestError::InvalidMethod(method.to_string()))?;
        let parsed = Url::parse(url).map_err(|source| RequestError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(RequestError::UnsupportedScheme(other.to_string())),
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(RequestError::MissingHost(url.to_string()));
        }

        Ok(Self {
            method,
            url: parsed,
            headers: Vec::new(),
            body: None,
        })
    }

    /// Adds a header from a `Name: value` (or bare `Name`) line.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidHeader` when the name or value is not valid HTTP.
    pub fn with_header_line(self, line: &str) -> Result<Self, RequestError> {
        let (name, value) = parse_header_line(line);
        if !is_valid_header(&name, &value) {
            return Err(RequestError::InvalidHeader(line.to_string()));
        }
        self.with_header(name, value)
    }

    /// Adds a header. The name is stored in canonical form.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::InvalidHeader` when the name or value is not valid HTTP.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let name = canonical_header_key(name.as_ref());
        let value = value.into();
        if !is_valid_header(&name, &value) {
            return Err(RequestError::InvalidHeader(format!("{name}: {value}")));
        }
        self.headers.push((name, value));
        Ok(self)
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// User-supplied headers, in order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// `METHOD URL`, used to name the request in errors and logs.
    pub fn summary(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Fills in the headers the client adds on its own.
    ///
    /// `Host` comes from the URL, never from host mappings. `User-Agent` is only
    /// added when the user did not set one. `Content-Length` is added for a
    /// non-empty body and for methods that carry a body.
    pub fn prepare(&self, user_agent: &str) -> PreparedRequest {
        let has_header = |name: &str| {
            self.headers
                .iter()
                .any(|(n, _)| n.eq_ignore_ascii_case(name))
        };
        let body = self.body.clone().unwrap_or_default();

        let mut headers = Vec::with_capacity(self.headers.len() + 3);
        if !has_header("Host") {
            headers.push(("Host".to_string(), host_header(&self.url)));
        }
        if !has_header("User-Agent") {
            headers.push(("User-Agent".to_string(), user_agent.to_string()));
        }
        headers.extend(self.headers.iter().cloned());
        let sends_length = !body.is_empty()
            || matches!(self.method, Method::POST | Method::PUT | Method::PATCH);
        if sends_length && !has_header("Content-Length") {
            headers.push(("Content-Length".to_string(), body.len().to_string()));
        }

        PreparedRequest {
            method: self.method.clone(),
            url: self.url.clone(),
            target: self.url[Position::BeforePath..Position::AfterQuery].to_string(),
            headers,
            body,
        }
    }
}

/// The request exactly as sent.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    target: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl PreparedRequest {
    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Origin-form request target (`/path?query`).
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Protocol version; only HTTP/1.1 is spoken.
    pub fn version(&self) -> Version {
        Version::HTTP_11
    }

    /// Headers in send order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Body bytes, empty when none was given.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// `METHOD URL`, used to name the request in errors and logs.
    pub fn summary(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// True when the connection must be wrapped in TLS.
    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// `host:port` the client would dial without any host mapping.
    pub fn dial_target(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    pub(crate) fn to_hyper(&self) -> Result<hyper::Request<Full<Bytes>>, hyper::http::Error> {
        let mut builder = hyper::Request::builder()
            .method(self.method.clone())
            .uri(self.target.as_str())
            .version(Version::HTTP_11);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Full::new(self.body.clone()))
    }
}

fn is_valid_header(name: &str, value: &str) -> bool {
    HeaderName::from_bytes(name.as_bytes()).is_ok() && HeaderValue::from_str(value).is_ok()
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Splits a `Name: value` line at the first colon and trims both sides.
///
/// A line without a colon is a bare header name with an empty value. The name
/// is returned in canonical form.
pub fn parse_header_line(line: &str) -> (String, String) {
    let (name, value) = line.split_once(':').unwrap_or((line, ""));
    (canonical_header_key(name.trim()), value.trim().to_string())
}

/// Canonical HTTP header name: first letter and every letter after a hyphen
/// upper case, the rest lower case (`cONTENT-tYPE` becomes `Content-Type`).
///
/// Names containing non-token characters are returned unchanged.
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_line() {
        let cases = [
            ("", "", ""),
            ("a", "A", ""),
            ("a:b", "A", "b"),
            (" a   :   b     ", "A", "b"),
            ("Content-Type", "Content-Type", ""),
            ("Content-Type:", "Content-Type", ""),
            ("Content-Type: ", "Content-Type", ""),
            ("cONTENT-tYPE", "Content-Type", ""),
            ("   content-type   ", "Content-Type", ""),
            ("   content-type      : ", "Content-Type", ""),
            (
                "Content-Length: one-two-three",
                "Content-Length",
                "one-two-three",
            ),
            (
                "Content-length: oNe-tWo-tHrEe  ",
                "Content-Length",
                "oNe-tWo-tHrEe",
            ),
            ("Content-LENGTH:one ", "Content-Length", "one"),
            (
                "cONTENT-lENGTH: ONE-two-thREE     ",
                "Content-Length",
                "ONE-two-thREE",
            ),
            (
                "   content-length   :    one - tWo - thRee     ",
                "Content-Length",
                "one - tWo - thRee",
            ),
            ("X-Forwarded-For: a:b:c", "X-Forwarded-For", "a:b:c"),
        ];

        for (input, name, value) in cases {
            assert_eq!(
                parse_header_line(input),
                (name.to_string(), value.to_string()),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_canonical_header_key_keeps_invalid_names() {
        assert_eq!(canonical_header_key("x-request-id"), "X-Request-Id");
        assert_eq!(canonical_header_key("www-authenticate"), "Www-Authenticate");
        assert_eq!(canonical_header_key("bad name"), "bad name");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            RequestDescriptor::new("GE T", "http://example.com/"),
            Err(RequestError::InvalidMethod(_))
        ));
        assert!(matches!(
            RequestDescriptor::new("GET", "not a url"),
            Err(RequestError::InvalidUrl { .. })
        ));
        assert!(matches!(
            RequestDescriptor::new("GET", "ftp://example.com/"),
            Err(RequestError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn test_with_header_line_rejects_invalid_header() {
        let request = RequestDescriptor::new("GET", "http://example.com/").expect("valid");
        assert!(matches!(
            request.with_header_line(": no name"),
            Err(RequestError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_with_header_rejects_invalid_header() {
        let request = RequestDescriptor::new("GET", "http://example.com/").expect("valid");
        assert!(matches!(
            request.clone().with_header("bad name", "value"),
            Err(RequestError::InvalidHeader(h)) if h == "bad name: value"
        ));
        assert!(matches!(
            request.clone().with_header("X-Ok", "line\nbreak"),
            Err(RequestError::InvalidHeader(_))
        ));

        let request = request.with_header("x-ok", "fine").expect("valid header");
        assert_eq!(
            request.headers(),
            &[("X-Ok".to_string(), "fine".to_string())]
        );
    }

    #[test]
    fn test_prepare_fills_default_headers() {
        let request = RequestDescriptor::new("GET", "http://example.com:8080/a/b?x=1#frag")
            .expect("valid")
            .with_header_line("accept: text/plain")
            .expect("valid header");

        let prepared = request.prepare("agent/1.0");
        assert_eq!(prepared.target(), "/a/b?x=1");
        assert_eq!(prepared.dial_target(), "example.com:8080");
        assert_eq!(
            prepared.headers(),
            &[
                ("Host".to_string(), "example.com:8080".to_string()),
                ("User-Agent".to_string(), "agent/1.0".to_string()),
                ("Accept".to_string(), "text/plain".to_string()),
            ]
        );
        assert!(prepared.body().is_empty());
    }

    #[test]
    fn test_prepare_respects_user_headers_and_body() {
        let request = RequestDescriptor::new("POST", "https://example.com/submit")
            .expect("valid")
            .with_header("user-agent", "custom")
            .expect("valid header")
            .with_body("payload");

        let prepared = request.prepare("agent/1.0");
        assert!(prepared.is_https());
        assert_eq!(prepared.dial_target(), "example.com:443");
        assert_eq!(
            prepared.headers(),
            &[
                ("Host".to_string(), "example.com".to_string()),
                ("User-Agent".to_string(), "custom".to_string()),
                ("Content-Length".to_string(), "7".to_string()),
            ]
        );
        assert_eq!(prepared.body().as_ref(), b"payload");
    }

    #[test]
    fn test_dial_target_keeps_ipv6_brackets() {
        let request = RequestDescriptor::new("GET", "http://[::1]:8080/").expect("valid");
        assert_eq!(request.prepare("a").dial_target(), "[::1]:8080");
    }

    #[test]
    fn test_to_hyper_uses_origin_form() {
        let request = RequestDescriptor::new("DELETE", "http://example.com/item?id=7")
            .expect("valid")
            .prepare("agent");
        let hyper_request = request.to_hyper().expect("valid request");
        assert_eq!(hyper_request.method(), Method::DELETE);
        assert_eq!(hyper_request.uri(), "/item?id=7");
        assert_eq!(
            hyper_request.headers().get("host").map(|v| v.as_bytes()),
            Some(&b"example.com"[..])
        );
    }
}
