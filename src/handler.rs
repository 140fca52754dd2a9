//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! The server holds exactly one application handler, but that handler may be
//! a plain `async fn`, a [`Cors`](crate::middleware::Cors) wrapping one, or a
//! stack of middleware several levels deep. Each of those is a different
//! concrete type, so the handler is erased once at startup into a trait
//! object (`dyn ErasedHandler`) and called through it per request.
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ Cors::new(info, hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← stored as the `next` handler
//!        ↓ Server::serve(cors)
//! cors.into_boxed_handler()                        ← Arc<Cors>
//!        ↓
//! handler.call(req)  at request time               ← one vtable dispatch per layer
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` let tokio move the future across threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for everything that can answer a request.
///
/// You never implement this yourself. It is satisfied by:
///
/// - any `async fn` (or closure) with the signature
///   `async fn name(req: Request) -> impl IntoResponse`
/// - [`Cors`](crate::middleware::Cors), so middleware can wrap middleware
///
/// The trait is **sealed** (via the crate-private `Sealed` supertrait).
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

pub(crate) mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;

    fn get(uri: &str) -> Request {
        http::Request::get(uri).body(Bytes::new()).unwrap().into()
    }

    async fn teapot(_req: Request) -> StatusCode {
        StatusCode::IM_A_TEAPOT
    }

    #[tokio::test]
    async fn async_fn_is_erased_and_converted() {
        let handler = teapot.into_boxed_handler();
        let res = handler.call(get("/")).await;
        assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn closure_sees_the_request() {
        let handler = (|req: Request| async move { format!("path={}", req.path()) })
            .into_boxed_handler();
        let res = handler.call(get("/hello")).await;
        assert_eq!(res.body(), b"path=/hello");
    }
}
