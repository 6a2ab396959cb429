//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! The route table holds handlers of *different* concrete types in one
//! `HashMap`, so every handler is boxed behind `dyn Handler`. The chain from
//! user code to vtable call is:
//!
//! ```text
//! fn hello<'a>(req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult>
//!        ↓ app.get("/", hello)
//! Box::new(hello) as Box<dyn Handler>     ← blanket impl below
//!        ↓
//! handler.call(&mut req, &mut res).await  ← one virtual call per request
//! ```
//!
//! A handler receives the same mutable contexts the middleware saw. It answers
//! by writing to the [`Response`]; the returned future only reports failure.

use std::future::Future;
use std::pin::Pin;

use crate::error::BoxError;
use crate::request::Request;
use crate::response::Response;

/// A heap-allocated, type-erased future borrowing the request contexts.
///
/// `Pin<Box<…>>` is required because the runtime polls the future in place.
/// `Send` lets tokio move the request task across worker threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a handler reports back: `Ok` once it has written its response.
pub type HandlerResult = Result<(), BoxError>;

/// A terminal request handler bound to one `(method, path)` pair.
///
/// Implemented automatically for any function of the shape
///
/// ```text
/// fn name<'a>(req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult>
/// ```
///
/// For handlers that do no asynchronous work, wrap a plain closure with
/// [`immediate`].
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult> {
        self(req, res)
    }
}

pub(crate) type BoxedHandler = Box<dyn Handler>;

/// Adapts a synchronous closure into a [`Handler`].
///
/// ```rust
/// use quick::{App, handler::immediate};
///
/// let app = App::new().get("/", immediate(|_req, res| {
///     res.end("hello");
///     Ok(())
/// }));
/// ```
pub fn immediate<F>(f: F) -> Immediate<F>
where
    F: Fn(&mut Request, &mut Response) -> HandlerResult + Send + Sync + 'static,
{
    Immediate(f)
}

/// Handler returned by [`immediate`].
pub struct Immediate<F>(F);

impl<F> Handler for Immediate<F>
where
    F: Fn(&mut Request, &mut Response) -> HandlerResult + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult> {
        let result = (self.0)(req, res);
        Box::pin(std::future::ready(result))
    }
}
