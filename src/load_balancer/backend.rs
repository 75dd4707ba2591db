//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server by its network authority
//! - Parse and validate authorities from configuration
//! - Build outbound URIs for probes and forwarded requests

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::Uri;
use thiserror::Error;

/// Error returned when a configured backend address is not a usable authority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("backend address is empty")]
    Empty,

    #[error("backend address `{0}` is not a valid authority")]
    Invalid(String),

    #[error("backend address `{0}` has no port")]
    MissingPort(String),
}

/// A single backend server.
///
/// Identity is the authority string; cloning is cheap and the value never
/// changes once configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Backend {
    authority: Arc<str>,
}

impl Backend {
    /// Parse a configured backend address.
    ///
    /// A bare port (`8081`) is shorthand for a local backend on that port.
    pub fn parse(raw: &str) -> Result<Self, AuthorityError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AuthorityError::Empty);
        }

        let candidate = if raw.bytes().all(|b| b.is_ascii_digit()) {
            format!("localhost:{raw}")
        } else {
            raw.to_string()
        };

        let authority = Authority::from_str(&candidate)
            .map_err(|_| AuthorityError::Invalid(raw.to_string()))?;
        if authority.as_str().contains('@') {
            return Err(AuthorityError::Invalid(raw.to_string()));
        }
        match authority.port_u16() {
            Some(port) if port != 0 => {}
            _ => return Err(AuthorityError::MissingPort(raw.to_string())),
        }

        Ok(Self {
            authority: Arc::from(authority.as_str()),
        })
    }

    /// The `host:port` this backend is reached at.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Absolute `http://` URI for `path_and_query` on this backend.
    pub fn uri(&self, path_and_query: &str) -> Result<Uri, axum::http::Error> {
        let path = PathAndQuery::from_str(path_and_query)?;
        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority())
            .path_and_query(path)
            .build()?;
        Ok(uri)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority)
    }
}

impl FromStr for Backend {
    type Err = AuthorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
