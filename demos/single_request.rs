//! Normalizes one route only, and shows a custom transform writing to a
//! separate field.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example single_request
//!
//! Try:
//!   curl 'http://localhost:4000/?page-size=10'
//!   → {"pageSize":"10"}
//!   curl 'http://localhost:4000/raw?page-size=10'
//!   → {"page-size":"10"}
//!   curl -X POST http://localhost:4000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"firstName":"Ada","homeAddress":{"postCode":"N1"}}'
//!   → {"first_name":"Ada","home_address":{"post_code":"N1"}}

use http::Method;
use rekey::{NormalizeOptions, Request, Router, Server, Value, normalize};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let camel_query = normalize(NormalizeOptions::new().target("query").convert("camel"));
    let snake_body = normalize(
        NormalizeOptions::new()
            .target("body")
            .name("input")
            .convert_fn(rekey::case::snake),
    );

    let app = Router::new()
        .on_with(Method::GET, "/", camel_query, show_query)
        .get("/raw", show_query)
        .on_with(Method::POST, "/users", snake_body, show_input);

    if let Err(e) = Server::bind("0.0.0.0:4000").serve(app).await {
        tracing::error!("server error: {e}");
    }
}

async fn show_query(req: Request) -> Value {
    req.field("query").cloned().unwrap_or_default()
}

async fn show_input(req: Request) -> Value {
    req.field("input").cloned().unwrap_or_default()
}
