//! JSON body parsing.

use http::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::{Middleware, MiddlewareResult, Next};
use crate::handler::BoxFuture;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

/// Parses the body of `POST` requests as JSON into [`Request::body`].
///
/// Other methods and empty bodies pass through untouched. A body that is not
/// valid JSON is answered with `400 Bad Request` and the chain stops there.
pub fn json_body() -> Middleware {
    Middleware::continuation("json-body", parse_json_body)
}

fn parse_json_body<'a>(req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a, MiddlewareResult> {
    Box::pin(async move {
        let is_post = Method::resolve(req.method()) == Ok(Method::Post);
        if is_post && !req.raw_body().is_empty() {
            match serde_json::from_slice::<Value>(req.raw_body()) {
                Ok(body) => req.set_body(body),
                Err(e) => {
                    debug!(error = %e, url = req.url(), "rejecting malformed JSON body");
                    res.status(StatusCode::BAD_REQUEST).finish();
                    next.halt();
                    return Ok(());
                }
            }
        }
        next.run(req, res).await?;
        Ok(())
    })
}
