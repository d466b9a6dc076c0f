// Shared test helpers: a local HTTP server with canned responses.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::net::SocketAddr;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

/// Routes:
/// - `/no-content`: 204, empty body
/// - `/missing`: 404 with a text body
/// - `/redirect`: 302 to `/next`
/// - `/host`: 200, body is the received `Host` header
/// - `/json`: 200 `application/json`
/// - `/binary`: 200, 300 bytes of binary data
pub fn test_app() -> Router {
    Router::new()
        .route("/no-content", get(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "no such page") }),
        )
        .route(
            "/redirect",
            get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/next")]) }),
        )
        .route(
            "/host",
            get(|headers: HeaderMap| async move {
                headers
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        )
        .route(
            "/json",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/json")],
                    r#"{"status":"ok"}"#,
                )
                    .into_response()
            }),
        )
        .route(
            "/binary",
            get(|| async {
                let body: Vec<u8> = (0..300u16).map(|i| (i % 256) as u8).collect();
                body
            }),
        )
}

/// Starts the test server on an ephemeral port.
#[allow(dead_code)] // Used by other test files
pub async fn start_test_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, test_app())
            .await
            .expect("Server failed to start");
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)] // Used by other test files
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    listener.local_addr().expect("Failed to get address")
}
