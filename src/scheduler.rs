//! Continuation scheduler.
//!
//! Walks one request through the middleware chain, one step at a time, and
//! hands it to the router once the chain is exhausted. Each step operates on
//! the remaining suffix of the chain; nothing is ever mutated, so the same
//! chain serves every concurrent request.
//!
//! ```text
//! run([a, b, c], req, res)
//!   a: Deferred      → await a(req, res)        → run([b, c])
//!   b: Continuation  → b(req, res, Next([c]))   → run([c]) unless b consumed Next
//!   c: Terminal      → c(req, res)              → stop, no routing
//! run([], req, res)  → route(req, res)          → handler, or 404
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use http::StatusCode;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::handler::BoxFuture;
use crate::method::Method;
use crate::middleware::{Behavior, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The continuation handed to a [`Continuation`](crate::MiddlewareKind::Continuation)
/// middleware.
///
/// `Next` is consumed by [`run`](Next::run) or [`halt`](Next::halt), so the
/// rest of the chain can be started at most once per step. Dropping it
/// without calling either leaves the decision to the scheduler, which
/// continues the chain as soon as the middleware returns.
pub struct Next<'a> {
    rest: &'a [Middleware],
    router: &'a Router,
    claimed: &'a AtomicBool,
}

impl<'a> Next<'a> {
    /// Runs the rest of the chain, then routing, against `req` / `res`.
    ///
    /// The contexts are borrowed only for the duration of the returned
    /// future, so the middleware can inspect the finished response afterwards.
    /// The chain counts as advanced once that future is first polled; a future
    /// dropped unpolled leaves the step to the scheduler.
    #[must_use = "the rest of the chain only runs when the future is awaited"]
    pub fn run<'b>(self, req: &'b mut Request, res: &'b mut Response) -> BoxFuture<'b, Result<(), Error>>
    where
        'a: 'b,
    {
        Box::pin(async move {
            self.claimed.store(true, Ordering::Release);
            run(self.rest, self.router, req, res).await
        })
    }

    /// Ends the chain here. Nothing after this middleware runs.
    pub fn halt(self) {
        self.claimed.store(true, Ordering::Release);
    }

    /// Number of middleware still ahead in the chain.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }
}

/// Runs `chain` against one request, then routes it.
///
/// Returns once the chain has stopped: a terminal middleware ran, a
/// continuation halted, the handler returned, or the 404 was written.
/// Failures of middleware and handlers are returned unrecovered.
pub fn run<'a>(
    chain: &'a [Middleware],
    router: &'a Router,
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        let Some((head, rest)) = chain.split_first() else {
            return route(router, req, res).await;
        };

        trace!(middleware = head.name(), kind = ?head.kind(), remaining = rest.len(), "invoking middleware");

        match &head.behavior {
            Behavior::Terminal(f) => {
                f(req, res);
                debug!(middleware = head.name(), skipped = rest.len(), "chain ended by terminal middleware");
                Ok(())
            }
            Behavior::Deferred(m) => {
                m.call(req, res)
                    .await
                    .map_err(|source| Error::middleware(head.name(), source))?;
                run(rest, router, req, res).await
            }
            Behavior::Continuation(m) => {
                let claimed = AtomicBool::new(false);
                let next = Next { rest, router, claimed: &claimed };
                m.call(req, res, next)
                    .await
                    .map_err(|source| Error::middleware(head.name(), source))?;

                if claimed.load(Ordering::Acquire) {
                    Ok(())
                } else {
                    run(rest, router, req, res).await
                }
            }
        }
    })
}

/// Terminal step: exact-match lookup, then the handler or a 404.
async fn route(router: &Router, req: &mut Request, res: &mut Response) -> Result<(), Error> {
    let method = match Method::resolve(req.method()) {
        Ok(method) => method,
        Err(e) => {
            warn!(error = %e, url = req.url(), "rejecting request");
            res.status(StatusCode::NOT_FOUND).finish();
            return Ok(());
        }
    };

    let Some(handler) = router.resolve(method, req.url()) else {
        debug!(%method, url = req.url(), "no route matched");
        res.status(StatusCode::NOT_FOUND).finish();
        return Ok(());
    };

    handler.call(req, res).await.map_err(|source| Error::Handler {
        method,
        path: req.url().to_owned(),
        source,
    })
}
