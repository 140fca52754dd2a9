//! # corsgate
//!
//! Origin allow-list CORS middleware for services behind hyper.
//!
//! ## The contract
//!
//! Configure the origins allowed to read your responses, wrap your handler,
//! serve. Every response to an allowed origin carries
//! `Access-Control-Allow-Origin` and `Access-Control-Allow-Methods`;
//! responses to everyone else carry neither. `OPTIONS` preflights are
//! answered with `200 OK` by the middleware and never reach your handler.
//!
//! What corsgate intentionally ignores: routing, authentication, rate
//! limiting, TLS termination, and any origin policy beyond exact string match
//! or the `*` wildcard.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use corsgate::middleware::{Cors, CorsInfo};
//! use corsgate::{Request, Response, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), corsgate::Error> {
//!     // A malformed origin fails here, before anything is served.
//!     let info: CorsInfo = "https://app.example.com,http://localhost:5173".parse()?;
//!
//!     let app = Cors::new(info, keys);
//!     Server::bind(([0, 0, 0, 0], 3000).into()).serve(app).await
//! }
//!
//! async fn keys(req: Request) -> Response {
//!     Response::json(format!(r#"{{"path":"{}"}}"#, req.path()).into_bytes())
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod server;

pub mod middleware;

pub use error::{Error, OriginError};
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use server::Server;
