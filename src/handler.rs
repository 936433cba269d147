//! Route endpoints.
//!
//! A route ends in a [`Handler`]: the stage [`Next`](crate::middleware::Next)
//! reaches once every middleware has handed the request on. `async fn`s
//! taking a [`Request`] and returning anything [`IntoResponse`] are handlers
//! as they are; other types can implement the trait and borrow their own
//! state for the duration of the call.
//!
//! The router stores endpoints as `Arc<dyn Handler>`, so routes of different
//! handler types share one tree.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// Middleware and endpoints may borrow from themselves and from the chain
/// they run in for `'a`.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = Response> + Send + 'a>>;

/// The end of a route's pipeline.
///
/// ```rust
/// use rekey::{BoxFuture, Handler, IntoResponse, Request};
///
/// struct Greeting(String);
///
/// impl Handler for Greeting {
///     fn call(&self, _req: Request) -> BoxFuture<'_> {
///         Box::pin(async move { self.0.clone().into_response() })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture<'_>;
}

pub(crate) type Endpoint = Arc<dyn Handler>;

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send,
{
    fn call(&self, req: Request) -> BoxFuture<'_> {
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
