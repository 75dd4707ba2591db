//! Inbound request inspection.
//!
//! # Responsibilities
//! - Log request metadata on arrival (method, path, protocol, peer, host, headers)
//! - Expose the request ID assigned by the middleware stack

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID set by `SetRequestIdLayer`, or `"unknown"` outside the full stack.
pub fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Peer address, when the server was started with connect info.
pub fn remote_addr(request: &Request<Body>) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// Log the metadata of a freshly received request.
pub fn log_request(request: &Request<Body>, request_id: &str) {
    let remote = remote_addr(request)
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or("");

    tracing::info!(
        request_id = %request_id,
        remote = %remote,
        method = %request.method(),
        path = %request.uri().path(),
        protocol = ?request.version(),
        host = %host,
        "Received request"
    );
    for (name, value) in request.headers() {
        tracing::debug!(
            request_id = %request_id,
            header = %name,
            value = %String::from_utf8_lossy(value.as_bytes()),
            "Request header"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_and_remote() {
        let mut request = Request::builder()
            .uri("/x")
            .header(X_REQUEST_ID, "abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&request), "abc");
        assert_eq!(remote_addr(&request), None);

        let peer: SocketAddr = "10.1.2.3:4567".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(remote_addr(&request), Some(peer));
    }

    #[test]
    fn test_missing_request_id() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(request_id(&request), "unknown");
    }
}
