//! Normalizes the query of every request to camelCase.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example all_requests
//!
//! Try:
//!   curl 'http://localhost:4000/?page-size=10&SortOrder=asc'
//!   → {"pageSize":"10","sortOrder":"asc"}

use rekey::{NormalizeOptions, Request, Router, Server, Value, normalize};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = NormalizeOptions::new().target("query").convert("camel");

    let app = Router::new()
        .middleware(normalize(options))
        .get("/", show_query);

    if let Err(e) = Server::bind("0.0.0.0:4000").serve(app).await {
        tracing::error!("server error: {e}");
    }
}

async fn show_query(req: Request) -> Value {
    req.field("query").cloned().unwrap_or_default()
}
