//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use edge_balancer::config::{loader::finalize, BalancerConfig};
use edge_balancer::{HttpServer, Registry};

/// What a programmable backend does with one request.
#[allow(dead_code)]
pub enum Reply {
    /// Full response with status, extra headers and body.
    Full {
        status: &'static str,
        headers: Vec<(&'static str, &'static str)>,
        body: Vec<u8>,
    },
    /// Promise `Content-Length` bytes, send fewer, then close.
    Truncated,
}

#[allow(dead_code)]
impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Reply::Full {
            status: "200 OK",
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn status(status: &'static str) -> Self {
        Reply::Full {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

/// The request line of a request seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(Seen) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                handle(socket, f.as_ref()).await;
            });
        }
    });
    addr
}

/// Start a mock backend that is healthy and answers `/` with `body`.
#[allow(dead_code)]
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| async move { Reply::ok(body) }).await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn handle<F, Fut>(mut socket: TcpStream, f: &F)
where
    F: Fn(Seen) -> Fut,
    Fut: Future<Output = Reply>,
{
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let text = String::from_utf8_lossy(&head);
    let mut request_line = text.lines().next().unwrap_or("").split_whitespace();
    let seen = Seen {
        method: request_line.next().unwrap_or("").to_string(),
        path: request_line.next().unwrap_or("").to_string(),
    };

    let bytes = match f(seen).await {
        Reply::Full { status, headers, body } => {
            let mut out = format!("HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n", status, body.len());
            for (name, value) in headers {
                out.push_str(&format!("{}: {}\r\n", name, value));
            }
            out.push_str("\r\n");
            let mut out = out.into_bytes();
            out.extend_from_slice(&body);
            out
        }
        Reply::Truncated => b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial".to_vec(),
    };
    let _ = socket.write_all(&bytes).await;
    let _ = socket.shutdown().await;
}

/// Start the balancer on an ephemeral port and return its address and registry.
///
/// Returns once the listener is bound; the startup probe cycle runs before
/// the first connection is accepted.
pub async fn start_balancer(config: BalancerConfig) -> (SocketAddr, Arc<Registry>) {
    let loaded = finalize(config).expect("valid test config");
    let server = HttpServer::new(loaded);
    let registry = server.registry();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    (addr, registry)
}

/// Config for `backends` with a one-second probe interval.
pub fn config_for(backends: &[SocketAddr]) -> BalancerConfig {
    let mut config = BalancerConfig::default();
    config.backends = backends.iter().map(|a| a.to_string()).collect();
    config.health_check.interval_ms = 1_000;
    config.health_check.timeout_ms = 500;
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
