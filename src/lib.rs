//! # rekey
//!
//! Request middleware that recursively rewrites the keys of nested request
//! data, plus the thin HTTP host it runs in.
//!
//! ## The contract
//!
//! [`normalize`] builds a [`NormalizeKeys`] middleware from three options:
//!
//! - **`target`**: the request field to read (default `"query"`)
//! - **`name`**: the request field to write (default: the target)
//! - **`convert`**: a named case transform (`"camel"`, `"snake"`,
//!   `"pascal"`, ... see [`case`]) or any `Fn(&str) -> String`
//!   (default `"camel"`)
//!
//! Per request it reads the target (an empty object if it is missing),
//! rebuilds it with every object key converted at every depth, writes the
//! result to `name` and hands the request on. Values are never touched.
//! An unknown transform name leaves keys as they are.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rekey::{normalize, NormalizeOptions, Request, Router, Server, Value};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         // ?page-size=10&SortOrder=asc  →  { "pageSize": "10", "sortOrder": "asc" }
//!         .middleware(normalize(NormalizeOptions::new()))
//!         .get("/search", search);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn search(req: Request) -> Value {
//!     req.field("query").cloned().unwrap_or_default()
//! }
//! ```
//!
//! The engine is usable without the host: [`apply_to_keys`] works on any
//! [`Value`], and [`NormalizeKeys::apply`] on anything implementing
//! [`Fields`].

mod error;
mod handler;
mod normalize;
mod request;
mod response;
mod router;
mod server;
mod value;

pub mod case;
pub mod classify;
pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use normalize::{
    Convert, NormalizeKeys, NormalizeOptions, apply_to_keys, apply_to_keys_with, convert_key,
    convert_key_with, normalize,
};
pub use request::{Fields, Request};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::{DEFAULT_MAX_BODY_SIZE, Server};
pub use value::{Function, Map, Value};
