//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router that sends every path to the balancer
//! - Wire up middleware (request ID, tracing)
//! - Run the startup probe cycle before accepting traffic
//! - Spawn the background health prober
//! - Per request: select a backend, forward, map failures to status codes

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::LoadedConfig;
use crate::health::HealthProber;
use crate::http::forward::Forwarder;
use crate::http::request::{log_request, request_id};
use crate::http::response::ProxyError;
use crate::load_balancer::{Registry, Selector};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub selector: Selector,
    pub forwarder: Forwarder,
}

/// The balancer's HTTP front end.
pub struct HttpServer {
    router: Router,
    registry: Arc<Registry>,
    prober: HealthProber,
}

impl HttpServer {
    /// Assemble registry, prober, selector and forwarder from validated config.
    pub fn new(loaded: LoadedConfig) -> Self {
        let LoadedConfig { config, backends } = loaded;

        let registry = Arc::new(Registry::new());
        let prober = HealthProber::new(backends, registry.clone(), config.health_check.clone());
        let state = AppState {
            selector: Selector::new(registry.clone(), config.policy),
            forwarder: Forwarder::new(&config.forward),
        };

        tracing::info!(
            policy = ?config.policy,
            forward_mode = ?config.forward.mode,
            forward_timeout = ?config.forward.timeout(),
            "Balancer configured"
        );

        Self {
            router: build_router(state),
            registry,
            prober,
        }
    }

    /// Registry shared by the prober and the request handlers.
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Run the server on an already bound listener.
    ///
    /// One probe cycle completes before the first connection is accepted.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        self.prober.run_cycle().await;
        self.prober.clone().spawn();

        tracing::info!(address = %addr, "HTTP server starting");
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(proxy_handler))
        .route("/{*path}", any(proxy_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::debug_span!(
                "request",
                request_id = %request_id(request),
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Main proxy handler: select a backend, forward, relay the body.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request);
    log_request(&request, &request_id);

    let backend = match state.selector.select() {
        Ok(backend) => backend,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Load balancing failed");
            let err = ProxyError::from(e);
            metrics::record_request(err.status().as_u16(), "none", start);
            return err.into_response();
        }
    };

    tracing::debug!(request_id = %request_id, backend = %backend, "Forwarding request");

    match state.forwarder.forward(&backend, request).await {
        Ok(body) => {
            tracing::info!(
                request_id = %request_id,
                backend = %backend,
                bytes = body.len(),
                took = ?start.elapsed(),
                "Request processed"
            );
            metrics::record_request(200, backend.authority(), start);
            Body::from(body).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, backend = %backend, error = %e, "Forwarding failed");
            let err = ProxyError::from(e);
            metrics::record_request(err.status().as_u16(), backend.authority(), start);
            err.into_response()
        }
    }
}
