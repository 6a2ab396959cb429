//! Middleware layer.
//!
//! Middleware run in registration order before routing and are the right
//! place for cross-cutting concerns: tracing, body parsing, request stamping,
//! authentication-header inspection.
//!
//! Every middleware carries an explicit [`MiddlewareKind`], chosen by the
//! constructor used to build it. The kind alone decides how the scheduler
//! treats it:
//!
//! | Kind | Signature | After it returns |
//! |---|---|---|
//! | [`Terminal`](MiddlewareKind::Terminal) | `Fn(&mut Request, &mut Response)` | chain stops |
//! | [`Continuation`](MiddlewareKind::Continuation) | `(req, res, Next) -> future` | scheduler continues unless `next` was consumed |
//! | [`Deferred`](MiddlewareKind::Deferred) | `(req, res) -> future` | scheduler continues once the future resolves `Ok` |
//!
//! Built-in middleware:
//! - [`trace()`]: per-request span with method, url, status, latency
//! - [`json_body()`]: parses a POST body into [`Request::body`]

mod body;
mod trace;

use std::borrow::Cow;
use std::fmt;

use crate::error::BoxError;
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;

pub use crate::scheduler::Next;
pub use body::json_body;
pub use trace::trace;

/// What a continuation or deferred middleware reports back.
pub type MiddlewareResult = Result<(), BoxError>;

/// How the scheduler drives a middleware.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MiddlewareKind {
    /// Fire-and-forget. Invoked synchronously; nothing runs after it.
    Terminal,
    /// Receives a single-use [`Next`] and decides when the chain advances.
    Continuation,
    /// Returns a future; the chain advances when it resolves successfully.
    Deferred,
}

/// A middleware that takes an explicit continuation.
///
/// Implemented automatically for functions of the shape
/// `fn<'a>(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a, MiddlewareResult>`.
pub trait ContinuationFn: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, MiddlewareResult>;
}

impl<F> ContinuationFn for F
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a, MiddlewareResult>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, MiddlewareResult> {
        self(req, res, next)
    }
}

/// A middleware whose returned future gates progression.
///
/// Implemented automatically for functions of the shape
/// `fn<'a>(&'a mut Request, &'a mut Response) -> BoxFuture<'a, MiddlewareResult>`.
pub trait DeferredFn: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, MiddlewareResult>;
}

impl<F> DeferredFn for F
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, MiddlewareResult>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, MiddlewareResult> {
        self(req, res)
    }
}

type TerminalFn = dyn Fn(&mut Request, &mut Response) + Send + Sync;

pub(crate) enum Behavior {
    Terminal(Box<TerminalFn>),
    Continuation(Box<dyn ContinuationFn>),
    Deferred(Box<dyn DeferredFn>),
}

/// A named, kind-tagged unit of per-request behaviour.
pub struct Middleware {
    name: Cow<'static, str>,
    pub(crate) behavior: Behavior,
}

impl Middleware {
    /// A fire-and-forget middleware.
    ///
    /// It is called synchronously and the chain ends with it: no later
    /// middleware and no handler run for the request. Any asynchronous work
    /// it wants done must be spawned with owned data.
    pub fn terminal<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
    {
        Self { name: name.into(), behavior: Behavior::Terminal(Box::new(f)) }
    }

    /// A middleware handed the continuation.
    ///
    /// Calling [`Next::run`] advances the chain in place; [`Next::halt`] stops
    /// it. If the middleware does neither, the scheduler advances once the
    /// middleware's future completes.
    pub fn continuation(name: impl Into<Cow<'static, str>>, f: impl ContinuationFn) -> Self {
        Self { name: name.into(), behavior: Behavior::Continuation(Box::new(f)) }
    }

    /// A middleware whose future must resolve before the chain advances.
    ///
    /// An `Err` stops the chain and is reported as [`Error::Middleware`](crate::Error::Middleware).
    pub fn deferred(name: impl Into<Cow<'static, str>>, f: impl DeferredFn) -> Self {
        Self { name: name.into(), behavior: Behavior::Deferred(Box::new(f)) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MiddlewareKind {
        match self.behavior {
            Behavior::Terminal(_)     => MiddlewareKind::Terminal,
            Behavior::Continuation(_) => MiddlewareKind::Continuation,
            Behavior::Deferred(_)     => MiddlewareKind::Deferred,
        }
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}
