//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Each route carries its
//! own middleware stack; application-wide middleware runs in front of it.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{Endpoint, Handler};
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::value::{Map, Value};

struct Route {
    layers: Vec<BoxedMiddleware>,
    handler: Endpoint,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every registration method returns `self` so calls chain naturally.
///
/// ```rust
/// use rekey::{normalize, NormalizeOptions, Request, Router, Value};
///
/// async fn search(req: Request) -> Value {
///     req.field("query").cloned().unwrap_or_default()
/// }
///
/// // Every request:
/// let app = Router::new()
///     .middleware(normalize(NormalizeOptions::new()))
///     .get("/search", search);
///
/// // One route only:
/// let app = Router::new()
///     .on_with(http::Method::GET, "/search", normalize(NormalizeOptions::new()), search);
/// ```
pub struct Router {
    layers: Vec<BoxedMiddleware>,
    routes: HashMap<Method, MatchitRouter<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self { layers: Vec::new(), routes: HashMap::new() }
    }

    /// Adds middleware that runs for every matched route, after the
    /// middleware added before it.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, Vec::new(), handler)
    }

    /// Like [`on`](Router::on), with middleware that runs for this route only.
    pub fn on_with(
        self,
        method: Method,
        path: &str,
        middleware: impl Middleware,
        handler: impl Handler,
    ) -> Self {
        self.add(method, path, vec![Arc::new(middleware)], handler)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    fn add(
        mut self,
        method: Method,
        path: &str,
        layers: Vec<BoxedMiddleware>,
        handler: impl Handler,
    ) -> Self {
        let route = Route { layers, handler: Arc::new(handler) };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Routes one request through its middleware stack and handler.
    ///
    /// On a match, the route parameters are stored in the `params` field
    /// before any middleware runs. Unmatched requests get `404 Not Found`
    /// without running middleware.
    pub async fn handle(&self, mut req: Request) -> Response {
        let path = req.path().to_owned();
        let Some(tree) = self.routes.get(req.method()) else {
            debug!(method = %req.method(), %path, "no route");
            return Response::status(StatusCode::NOT_FOUND);
        };
        let Ok(matched) = tree.at(&path) else {
            debug!(method = %req.method(), %path, "no route");
            return Response::status(StatusCode::NOT_FOUND);
        };

        let params: Map = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), Value::from(v)))
            .collect();
        let route = matched.value;
        req.set_field("params", Value::Object(params));

        Next::new(&self.layers, &route.layers, route.handler.as_ref()).run(req).await
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::BoxFuture;

    async fn show_params(req: Request) -> Value {
        req.field("params").cloned().unwrap_or_default()
    }

    struct Tag(&'static str);

    impl Middleware for Tag {
        fn handle<'a>(&'a self, mut req: Request, next: Next<'a>) -> BoxFuture<'a> {
            req.set_field(self.0, Value::from(true));
            Box::pin(next.run(req))
        }
    }

    async fn show_fields(req: Request) -> Value {
        let mut fields = req.fields().clone();
        fields.shift_remove("params");
        Value::Object(fields)
    }

    #[tokio::test]
    async fn path_params_land_in_the_params_field() {
        let app = Router::new().get("/users/{user_id}/posts/{post_id}", show_params);
        let res = app.handle(Request::new(Method::GET, "/users/7/posts/9")).await;
        assert_eq!(res.body(), br#"{"user_id":"7","post_id":"9"}"#);
    }

    #[tokio::test]
    async fn unknown_path_or_method_is_404() {
        let app = Router::new().get("/a", show_params);
        let res = app.handle(Request::new(Method::GET, "/b")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        let res = app.handle(Request::new(Method::POST, "/a")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn route_middleware_applies_to_its_route_only() {
        let app = Router::new()
            .middleware(Tag("everywhere"))
            .on_with(Method::GET, "/tagged", Tag("here"), show_fields)
            .get("/plain", show_fields);

        let res = app.handle(Request::new(Method::GET, "/tagged")).await;
        assert_eq!(res.body(), br#"{"everywhere":true,"here":true}"#);

        let res = app.handle(Request::new(Method::GET, "/plain")).await;
        assert_eq!(res.body(), br#"{"everywhere":true}"#);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new().get("/a", show_params).get("/a", show_params);
    }
}
