//! Handler trait and type erasure.
//!
//! # How stateful async handlers are stored
//!
//! A [`Router<S>`](crate::Router) owns one shared state value `S` (for the
//! roster API that is the [`Roster`](crate::Roster)) and a tree per method
//! holding handlers of *different* concrete types. Handlers are erased to
//! `dyn ErasedHandler<S>` so they fit in one collection:
//!
//! ```text
//! async fn list(roster: Arc<Roster>, req: Request) -> impl IntoResponse
//!        ↓ router.get("/astronauts", list)
//! list.into_boxed_handler()                        ← Handler<S> blanket impl
//!        ↓
//! Arc::new(FnHandler(list))                        ← stored as BoxedHandler<S>
//!        ↓
//! handler.call(Arc::clone(&state), req)            ← one vtable dispatch
//!        ↓
//! Box::pin(async { list(state, req).await.into_response() })
//! ```
//!
//! Per request that costs one `Arc` clone for the handler, one for the state,
//! and one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler<S> {
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S> + Send + Sync + 'static>;

/// Implemented for every valid route handler over state `S`.
///
/// Never implemented by hand. Any function or closure shaped like
///
/// ```text
/// async fn name(state: Arc<S>, req: Request) -> impl IntoResponse
/// ```
///
/// satisfies it through the blanket impl. The trait is sealed so that impl
/// stays the only one.
pub trait Handler<S>: private::Sealed<S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<S>;
}

mod private {
    pub trait Sealed<S> {}
}

impl<F, Fut, R, S> private::Sealed<S> for F
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: Send + Sync + 'static,
{
}

impl<F, Fut, R, S> Handler<S> for F
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: Send + Sync + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler<S> {
        Arc::new(FnHandler(self))
    }
}

/// Holds a concrete handler `F` and bridges it to [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, Fut, R, S> ErasedHandler<S> for FnHandler<F>
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture {
        let fut = (self.0)(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
