//! Request dispatch.
//!
//! The [`Dispatcher`] performs exactly one HTTP/1.1 exchange per call:
//! - the dial target (`host:port` of the URL) goes through a [`DialResolver`],
//!   so host mappings change where the socket connects and nothing else
//! - `Host` and the TLS server name always come from the URL
//! - redirects are returned as-is, never followed
//! - the whole body is read before returning, and the connection is closed
//!
//! Connect, TLS handshake and the full round trip each have their own timeout.
//! A cancelled token aborts the in-flight request.

mod connect;
mod request;
mod response;

use log::debug;
use tokio_rustls::TlsConnector;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::{InitializationError, TransportError, TransportErrorKind};
use crate::host_mapping::{split_host_port, DialResolver};
use crate::initialization::init_tls_config;

pub use request::{canonical_header_key, parse_header_line, PreparedRequest, RequestDescriptor};
pub use response::CapturedResponse;

/// Sends requests according to a [`Config`].
pub struct Dispatcher<'a> {
    config: &'a Config,
    resolver: &'a dyn DialResolver,
    tls: TlsConnector,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher that dials through `config.host_mappings`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::TlsConfigError` if the TLS client
    /// configuration cannot be built.
    pub fn new(config: &'a Config) -> Result<Self, InitializationError> {
        let tls = TlsConnector::from(init_tls_config(config.insecure)?);
        Ok(Self {
            config,
            resolver: &config.host_mappings,
            tls,
        })
    }

    /// Replaces the dial hook.
    pub fn with_resolver(mut self, resolver: &'a dyn DialResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sends the request and captures the complete response.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` naming the request when no complete response
    /// was received: resolution, connect, TLS, protocol errors, the overall
    /// timeout, or cancellation.
    pub async fn dispatch(
        &self,
        request: &PreparedRequest,
        cancel: &CancellationToken,
    ) -> Result<CapturedResponse, TransportError> {
        let request_timeout = self.config.request_timeout;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportErrorKind::Cancelled),
            res = tokio::time::timeout(request_timeout, self.round_trip(request)) => {
                res.unwrap_or(Err(TransportErrorKind::Timeout {
                    secs: request_timeout.as_secs(),
                }))
            }
        };

        result.map_err(|kind| TransportError {
            request: request.summary(),
            kind,
        })
    }

    async fn round_trip(
        &self,
        request: &PreparedRequest,
    ) -> Result<CapturedResponse, TransportErrorKind> {
        let target = request.dial_target();
        let dial_to = with_target_port(self.resolver.resolve_dial_target(&target), &target);
        if dial_to != target {
            debug!("Dialing {dial_to} instead of {target}");
        }

        let stream = connect::dial(&dial_to, self.config.connect_timeout, self.config.keepalive)
            .await?;
        let hyper_request = request.to_hyper()?;

        let (parts, body) = if request.is_https() {
            let server_name = connect::server_name(request.url())?;
            let tls = connect::tls_handshake(
                stream,
                &self.tls,
                server_name,
                self.config.tls_handshake_timeout,
            )
            .await?;
            connect::exchange(tls, hyper_request).await?
        } else {
            connect::exchange(stream, hyper_request).await?
        };

        Ok(CapturedResponse::from_parts(parts, body))
    }
}

/// Appends the port of `target` when the resolved address has none.
fn with_target_port(resolved: String, target: &str) -> String {
    if split_host_port(&resolved).is_some() {
        return resolved;
    }
    match split_host_port(target) {
        Some((_, port)) => format!("{resolved}:{port}"),
        None => resolved,
    }
}
