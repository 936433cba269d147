//! Middleware layer.
//!
//! Middleware runs between the router and the route handler. Each stage
//! receives the request and a [`Next`] continuation; it may inspect or
//! rewrite the request, then hands it on with [`Next::run`].
//!
//! A router runs, in order:
//!
//! 1. application-wide middleware ([`Router::middleware`](crate::Router::middleware)),
//!    in registration order
//! 2. the matched route's own middleware ([`Router::on_with`](crate::Router::on_with))
//! 3. the route handler
//!
//! ```rust
//! use rekey::middleware::{Middleware, Next};
//! use rekey::{BoxFuture, Request, Value};
//!
//! struct Stamp;
//!
//! impl Middleware for Stamp {
//!     fn handle<'a>(&'a self, mut req: Request, next: Next<'a>) -> BoxFuture<'a> {
//!         req.set_field("stamped", Value::from(true));
//!         Box::pin(next.run(req))
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::handler::{BoxFuture, Handler};
use crate::request::Request;
use crate::response::Response;

/// A pipeline stage.
///
/// A stage that does not short-circuit must call `next.run` exactly once.
/// `Next` is consumed by `run`, so it cannot be called twice.
pub trait Middleware: Send + Sync + 'static {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a>;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The rest of the pipeline after the current stage.
pub struct Next<'a> {
    app: &'a [BoxedMiddleware],
    route: &'a [BoxedMiddleware],
    endpoint: &'a dyn Handler,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        app: &'a [BoxedMiddleware],
        route: &'a [BoxedMiddleware],
        endpoint: &'a dyn Handler,
    ) -> Self {
        Self { app, route, endpoint }
    }

    /// Runs the next stage, or the handler once every stage has run.
    pub async fn run(self, req: Request) -> Response {
        if let Some((stage, app)) = self.app.split_first() {
            return stage.handle(req, Next { app, ..self }).await;
        }
        if let Some((stage, route)) = self.route.split_first() {
            return stage.handle(req, Next { route, ..self }).await;
        }
        self.endpoint.call(req).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::{Method, StatusCode};

    use super::*;
    use crate::value::Value;

    /// Appends its label to the `trail` field.
    struct Mark(&'static str);

    impl Middleware for Mark {
        fn handle<'a>(&'a self, mut req: Request, next: Next<'a>) -> BoxFuture<'a> {
            let mut trail = req.field("trail").and_then(Value::as_array).unwrap_or(&[]).to_vec();
            trail.push(Value::from(self.0));
            req.set_field("trail", Value::Array(trail));
            Box::pin(next.run(req))
        }
    }

    struct Deny;

    impl Middleware for Deny {
        fn handle<'a>(&'a self, _req: Request, _next: Next<'a>) -> BoxFuture<'a> {
            Box::pin(async { Response::status(StatusCode::FORBIDDEN) })
        }
    }

    async fn echo_trail(req: Request) -> Response {
        let trail: Vec<&str> = req
            .field("trail")
            .and_then(Value::as_array)
            .unwrap_or(&[])
            .iter()
            .filter_map(Value::as_str)
            .collect();
        Response::text(trail.join(","))
    }

    #[tokio::test]
    async fn app_stages_run_before_route_stages() {
        let app: Vec<BoxedMiddleware> = vec![Arc::new(Mark("a")), Arc::new(Mark("b"))];
        let route: Vec<BoxedMiddleware> = vec![Arc::new(Mark("c"))];
        let res = Next::new(&app, &route, &echo_trail)
            .run(Request::new(Method::GET, "/"))
            .await;
        assert_eq!(res.body(), b"a,b,c");
    }

    #[tokio::test]
    async fn empty_chain_calls_the_handler() {
        let res = Next::new(&[], &[], &echo_trail).run(Request::new(Method::GET, "/")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"");
    }

    #[tokio::test]
    async fn a_stage_can_short_circuit() {
        static CALLED: Mutex<bool> = Mutex::new(false);
        async fn handler(_req: Request) -> Response {
            *CALLED.lock().unwrap() = true;
            Response::text("unreachable")
        }

        let app: Vec<BoxedMiddleware> = vec![Arc::new(Deny)];
        let res = Next::new(&app, &[], &handler).run(Request::new(Method::GET, "/")).await;

        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
        assert!(!*CALLED.lock().unwrap());
    }
}
