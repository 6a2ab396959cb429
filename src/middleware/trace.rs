//! Per-request tracing.

use std::time::Instant;

use tracing::{Instrument, info, info_span};

use super::{Middleware, MiddlewareResult, Next};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;

/// Wraps the rest of the chain in a `request` span and logs the outcome.
///
/// Register it first so the span covers every later middleware and the
/// handler. The completion event carries method, url, status and latency.
pub fn trace() -> Middleware {
    Middleware::continuation("trace", trace_request)
}

fn trace_request<'a>(req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a, MiddlewareResult> {
    Box::pin(async move {
        let method = req.method().to_owned();
        let url = req.url().to_owned();
        let span = info_span!("request", %method, %url);
        let started = Instant::now();

        let result = next.run(req, res).instrument(span).await;

        info!(
            %method,
            %url,
            status = res.status_code().as_u16(),
            finished = res.is_finished(),
            latency = ?started.elapsed(),
            "request completed"
        );
        result?;
        Ok(())
    })
}
