//! Application: the middleware chain and the route table, owned together.
//!
//! An `App` is configured once, then handed to [`Server::serve`](crate::Server::serve),
//! which freezes it behind an `Arc` for the lifetime of the server. Nothing
//! in it is mutated while requests are being served.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use http::StatusCode;
use tracing::{error, warn};

use crate::error::Error;
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::scheduler;

/// A configured application.
///
/// ```rust
/// use quick::{App, middleware, handler::immediate};
///
/// let app = App::new()
///     .with(middleware::trace())
///     .with(middleware::json_body())
///     .get("/", immediate(|_req, res| { res.end("hello"); Ok(()) }));
///
/// assert_eq!(app.chain().len(), 2);
/// ```
#[derive(Default)]
pub struct App {
    chain: Vec<Middleware>,
    router: Router,
}

impl App {
    pub fn new() -> Self {
        Self { chain: Vec::new(), router: Router::new() }
    }

    /// Appends a middleware. Registration order is invocation order.
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.chain.push(middleware);
        self
    }

    /// Appends several middleware, in iteration order.
    pub fn with_all(mut self, middleware: impl IntoIterator<Item = Middleware>) -> Self {
        self.chain.extend(middleware);
        self
    }

    pub fn route(mut self, method: Method, path: impl Into<String>, handler: impl Handler) -> Self {
        self.router.register(method, path, handler);
        self
    }

    pub fn get(self, path: impl Into<String>, handler: impl Handler) -> Self {
        self.route(Method::Get, path, handler)
    }

    pub fn post(self, path: impl Into<String>, handler: impl Handler) -> Self {
        self.route(Method::Post, path, handler)
    }

    pub fn chain(&self) -> &[Middleware] { &self.chain }
    pub fn router(&self) -> &Router { &self.router }

    /// Runs the chain and routing for one request, reporting failures as-is.
    pub async fn dispatch(&self, req: &mut Request, res: &mut Response) -> Result<(), Error> {
        scheduler::run(&self.chain, &self.router, req, res).await
    }

    /// Per-request entry point with an error boundary.
    ///
    /// Always produces a response:
    /// - a failing middleware or handler yields `500`, unless the response
    ///   was already finished before the failure;
    /// - a panic anywhere in the chain yields `500`, with the same exception
    ///   for a response finished before the panic;
    /// - a chain that stops without finishing the response (a terminal
    ///   middleware, or a handler that never writes) yields `500`.
    pub async fn handle(&self, mut req: Request) -> Response {
        let mut res = Response::new();
        let outcome = AssertUnwindSafe(self.dispatch(&mut req, &mut res))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) if res.is_finished() => res,
            Ok(Ok(())) => {
                warn!(method = req.method(), url = req.url(), "chain stopped without finishing the response");
                Response::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Ok(Err(e)) => {
                error!(method = req.method(), url = req.url(), error = %e, "request failed");
                if res.is_finished() {
                    res
                } else {
                    Response::empty(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
            Err(panic) => {
                error!(method = req.method(), url = req.url(), panic = panic_message(&*panic), "request panicked");
                if res.is_finished() {
                    res
                } else {
                    Response::empty(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
