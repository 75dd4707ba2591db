//! Mapping of request failures to client responses.
//!
//! Every failure on the request path ends in exactly one fixed response:
//! - no healthy backend → 503 `No healthy backends available`
//! - forwarding failure → 500 `Internal Server Error`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::forward::ForwardError;
use crate::load_balancer::SelectError;

pub const NO_HEALTHY_BACKENDS_BODY: &str = "No healthy backends available";
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Failure of a single proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Select(SelectError::NoHealthyBackends) => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Forward(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> &'static str {
        match self {
            ProxyError::Select(_) => NO_HEALTHY_BACKENDS_BODY,
            ProxyError::Forward(_) => INTERNAL_ERROR_BODY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.body()).into_response()
    }
}
