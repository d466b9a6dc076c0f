//! Connection layer: TCP dial, optional TLS, one HTTP/1.1 exchange.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::http::response::Parts;
use hyper_util::rt::TokioIo;
use log::debug;
use rustls::pki_types::ServerName;
use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{lookup_host, TcpSocket, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use url::{Host, Url};

use crate::error_handling::TransportErrorKind;

/// Resolves `target` and connects to the first address that accepts.
///
/// Resolution and every connect attempt share one deadline. Keep-alive is
/// enabled on the socket with `keepalive` as both idle time and probe interval.
pub(crate) async fn dial(
    target: &str,
    connect_timeout: Duration,
    keepalive: Duration,
) -> Result<TcpStream, TransportErrorKind> {
    let deadline = Instant::now() + connect_timeout;
    let timed_out = || TransportErrorKind::ConnectTimeout {
        target: target.to_string(),
        secs: connect_timeout.as_secs(),
    };

    let addrs: Vec<SocketAddr> = match timeout_at(deadline, lookup_host(target)).await {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(source)) => {
            return Err(TransportErrorKind::Resolve {
                target: target.to_string(),
                source,
            })
        }
        Err(_) => return Err(timed_out()),
    };
    if addrs.is_empty() {
        return Err(TransportErrorKind::Resolve {
            target: target.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
        });
    }

    let mut last_error = None;
    for addr in addrs {
        debug!("Connecting to {addr} for {target}");
        let socket = match new_socket(addr) {
            Ok(socket) => socket,
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        };

        match timeout_at(deadline, socket.connect(addr)).await {
            Ok(Ok(stream)) => {
                configure_stream(&stream, keepalive);
                return Ok(stream);
            }
            Ok(Err(e)) => {
                debug!("Connection to {addr} failed: {e}");
                last_error = Some(e);
            }
            Err(_) => return Err(timed_out()),
        }
    }

    Err(TransportErrorKind::Connect {
        target: target.to_string(),
        source: last_error
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no address tried")),
    })
}

fn new_socket(addr: SocketAddr) -> io::Result<TcpSocket> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_keepalive(true)?;
    Ok(socket)
}

fn configure_stream(stream: &TcpStream, keepalive: Duration) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {e}");
    }

    let params = TcpKeepalive::new().with_time(keepalive);
    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    let params = params.with_interval(keepalive);
    if let Err(e) = SockRef::from(stream).set_tcp_keepalive(&params) {
        debug!("Failed to set TCP keep-alive: {e}");
    }
}

/// TLS server name for the URL host. IP literals are sent as IP addresses.
pub(crate) fn server_name(url: &Url) -> Result<ServerName<'static>, TransportErrorKind> {
    match url.host() {
        Some(Host::Domain(domain)) => ServerName::try_from(domain.to_string())
            .map_err(|_| TransportErrorKind::InvalidServerName(domain.to_string())),
        Some(Host::Ipv4(ip)) => Ok(ServerName::from(std::net::IpAddr::V4(ip))),
        Some(Host::Ipv6(ip)) => Ok(ServerName::from(std::net::IpAddr::V6(ip))),
        None => Err(TransportErrorKind::InvalidServerName(String::new())),
    }
}

/// Wraps the stream in TLS within the handshake timeout.
pub(crate) async fn tls_handshake(
    stream: TcpStream,
    connector: &TlsConnector,
    server_name: ServerName<'static>,
    handshake_timeout: Duration,
) -> Result<TlsStream<TcpStream>, TransportErrorKind> {
    let name = server_name.to_str().into_owned();
    match timeout(handshake_timeout, connector.connect(server_name, stream)).await {
        Ok(Ok(tls)) => {
            debug!("TLS handshake with {name} complete");
            Ok(tls)
        }
        Ok(Err(source)) => Err(TransportErrorKind::TlsHandshake {
            server_name: name,
            source,
        }),
        Err(_) => Err(TransportErrorKind::TlsHandshakeTimeout {
            server_name: name,
            secs: handshake_timeout.as_secs(),
        }),
    }
}

/// Aborts the connection task when dropped, closing the socket on every path.
struct ConnectionGuard(JoinHandle<()>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Sends one request over the stream and reads the whole response body.
pub(crate) async fn exchange<S>(
    stream: S,
    request: hyper::Request<Full<Bytes>>,
) -> Result<(Parts, Bytes), TransportErrorKind>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::Builder::new()
        .title_case_headers(true)
        .handshake(TokioIo::new(stream))
        .await?;
    let _connection = ConnectionGuard(tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!("Connection closed with error: {e}");
        }
    }));

    let response = sender.send_request(request).await?;
    let (parts, body) = response.into_parts();
    let body = body.collect().await?.to_bytes();
    Ok((parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_server_name() {
        let url = Url::parse("https://example.com/").expect("valid url");
        assert_eq!(
            server_name(&url).expect("dns name").to_str(),
            "example.com"
        );

        let url = Url::parse("https://127.0.0.1:8443/").expect("valid url");
        assert!(matches!(
            server_name(&url).expect("ip address"),
            ServerName::IpAddress(_)
        ));

        let url = Url::parse("https://[::1]/").expect("valid url");
        assert!(matches!(
            server_name(&url).expect("ip address"),
            ServerName::IpAddress(_)
        ));
    }

    #[tokio::test]
    async fn test_dial_connects_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let stream = dial(
            &addr.to_string(),
            Duration::from_secs(5),
            Duration::from_secs(20),
        )
        .await
        .expect("connect");
        assert_eq!(stream.peer_addr().expect("peer addr"), addr);
    }

    #[tokio::test]
    async fn test_dial_refused_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let err = dial(
            &addr.to_string(),
            Duration::from_secs(5),
            Duration::from_secs(20),
        )
        .await
        .expect_err("nothing listens");
        assert!(matches!(err, TransportErrorKind::Connect { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_dial_unresolvable_is_resolve_error() {
        let err = dial("no-port-given", Duration::from_secs(5), Duration::from_secs(20))
            .await
            .expect_err("invalid socket address");
        assert!(matches!(err, TransportErrorKind::Resolve { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_exchange_reads_full_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0u8; 1024];
            let n = socket.read(&mut buf).await.expect("read request");
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            socket
                .write_all(b"HTTP/1.1 201 Made It\r\nX-Test: yes\r\nContent-Length: 5\r\n\r\nhello")
                .await
                .expect("write response");
            request
        });

        let stream = TcpStream::connect(addr).await.expect("connect");
        let request = hyper::Request::builder()
            .uri("/path")
            .header("Host", "example.com")
            .body(Full::new(Bytes::new()))
            .expect("valid request");

        let (parts, body) = exchange(stream, request).await.expect("exchange");
        assert_eq!(parts.status.as_u16(), 201);
        assert_eq!(body.as_ref(), b"hello");

        let raw_request = server.await.expect("server task");
        assert!(raw_request.starts_with("GET /path HTTP/1.1\r\n"), "{raw_request}");
        assert!(raw_request.contains("Host: example.com\r\n"), "{raw_request}");
    }
}
