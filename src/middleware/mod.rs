//! Middleware layer.
//!
//! Middleware wraps a [`Handler`](crate::Handler) and is itself a handler, so
//! layers stack by construction and the result is handed to
//! [`Server::serve`](crate::Server::serve) like any other handler.
//!
//! - [`Cors`] — origin allow-list, CORS response headers, preflight replies

mod cors;

pub use cors::{Cors, CorsInfo};
