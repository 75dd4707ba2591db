//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handler)
//!     → request.rs (request ID, metadata logging)
//!     → [selector picks backend]
//!     → forward.rs (outbound call, body read, deadline)
//!     → response.rs (failure → 503/500)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardError, Forwarder};
pub use request::X_REQUEST_ID;
pub use response::ProxyError;
pub use server::HttpServer;
