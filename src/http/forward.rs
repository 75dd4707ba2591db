//! Outbound forwarding to the selected backend.
//!
//! # Responsibilities
//! - Build the outbound request for the configured forward mode
//! - Read the backend's full response body
//! - Bound the whole exchange with the forward deadline
//!
//! Only the body comes back. The backend's status and headers are dropped,
//! so a backend 404 or 500 still reaches the client as a 200 with that body.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderName, Method, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::{ForwardConfig, ForwardMode};
use crate::load_balancer::Backend;

/// Connection-scoped headers that never cross the proxy.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "host",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName, listed: &[HeaderName]) -> bool {
    HOP_BY_HOP.contains(&name.as_str()) || listed.contains(name)
}

/// Failure while forwarding one request.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] axum::Error),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
}

/// Issues requests to backends and relays their bodies.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    mode: ForwardMode,
    timeout: Option<Duration>,
}

impl Forwarder {
    pub fn new(config: &ForwardConfig) -> Self {
        // One connection per request; nothing is pooled between requests.
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(HttpConnector::new());

        Self {
            client,
            mode: config.mode,
            timeout: config.timeout(),
        }
    }

    /// Forward `inbound` to `backend` and return the response body.
    pub async fn forward(&self, backend: &Backend, inbound: Request<Body>) -> Result<Bytes, ForwardError> {
        let outbound = self.outbound_request(backend, inbound)?;
        let exchange = async {
            let response = self.client.request(outbound).await?;
            tracing::debug!(
                backend = %backend,
                status = %response.status(),
                protocol = ?response.version(),
                "Response from backend"
            );
            let body = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
                .await
                .map_err(ForwardError::Body)?;
            Ok::<Bytes, ForwardError>(body)
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| ForwardError::Timeout(limit))?,
            None => exchange.await,
        }
    }

    fn outbound_request(&self, backend: &Backend, inbound: Request<Body>) -> Result<Request<Body>, ForwardError> {
        match self.mode {
            ForwardMode::Root => Ok(Request::builder()
                .method(Method::GET)
                .uri(backend.uri("/")?)
                .body(Body::empty())?),
            ForwardMode::PassThrough => {
                let (parts, body) = inbound.into_parts();
                let path = parts
                    .uri
                    .path_and_query()
                    .map(|p| p.as_str())
                    .unwrap_or("/");

                let mut builder = Request::builder()
                    .method(parts.method.clone())
                    .uri(backend.uri(path)?);
                // Headers named in `Connection` are hop-by-hop as well.
                let listed: Vec<HeaderName> = parts
                    .headers
                    .get_all(header::CONNECTION)
                    .iter()
                    .filter_map(|v| v.to_str().ok())
                    .flat_map(|v| v.split(','))
                    .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
                    .collect();

                if let Some(headers) = builder.headers_mut() {
                    for (name, value) in parts.headers.iter() {
                        if !is_hop_by_hop(name, &listed) {
                            headers.append(name.clone(), value.clone());
                        }
                    }
                }
                Ok(builder.body(body)?)
            }
        }
    }
}
