//! `corsgate` — serves a minimal endpoint behind the CORS middleware.
//!
//! Run with:
//!   RUST_LOG=debug cargo run -- --cors 'http://localhost:5173,https://app.example.com'
//!
//! Try:
//!   curl -i -H 'Origin: http://localhost:5173' http://localhost:3000/
//!   curl -i -X OPTIONS -H 'Origin: http://localhost:5173' http://localhost:3000/
//!   curl -i -H 'Origin: http://evil.example' http://localhost:3000/

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use corsgate::middleware::{Cors, CorsInfo};
use corsgate::{Request, Response, Server};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "CORSGATE_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Comma-separated origins allowed to read responses, or `*` for any.
    #[arg(long, env = "CORSGATE_CORS", default_value = "")]
    cors: CorsInfo,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(cors = %args.cors, "allowed origins");

    let app = Cors::new(args.cors, ping);
    match Server::bind(args.addr).serve(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn ping(req: Request) -> Response {
    Response::json(format!(r#"{{"method":"{}","path":"{}"}}"#, req.method(), req.path()).into_bytes())
}
