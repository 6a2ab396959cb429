//! Outgoing response context.
//!
//! Unlike a value returned from a handler, a quick [`Response`] is created by
//! the host before the chain starts and mutated in place by every step. It is
//! finished by exactly one terminal write ([`end`](Response::end),
//! [`text`](Response::text), [`json`](Response::json) or
//! [`finish`](Response::finish)). Later writes are ignored.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use tracing::warn;

/// An outgoing HTTP response.
///
/// ```rust
/// use quick::{Response, StatusCode};
///
/// let mut res = Response::new();
/// res.status(StatusCode::CREATED).json(&serde_json::json!({"id": 42})).unwrap();
/// assert!(res.is_finished());
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Response {
    /// `200 OK`, no headers, not yet finished.
    pub fn new() -> Self {
        Self { status: StatusCode::OK, headers: HeaderMap::new(), body: None }
    }

    /// A finished response with the given status and an empty body.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Some(Bytes::new()) }
    }

    pub fn status(&mut self, code: StatusCode) -> &mut Self {
        if self.guard_finished("status") {
            self.status = code;
        }
        self
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        if self.guard_finished("header") {
            self.headers.insert(name, value);
        }
        self
    }

    /// Finishes the response with `body` as-is.
    pub fn end(&mut self, body: impl Into<Bytes>) -> &mut Self {
        if self.guard_finished("body") {
            self.body = Some(body.into());
        }
        self
    }

    /// Finishes the response with an empty body.
    pub fn finish(&mut self) -> &mut Self {
        self.end(Bytes::new())
    }

    /// Finishes with a `text/plain; charset=utf-8` body.
    pub fn text(&mut self, body: impl Into<String>) -> &mut Self {
        self.header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")).end(body.into())
    }

    /// Serialises `value` and finishes with an `application/json` body.
    ///
    /// On a serialisation error the response is left untouched.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        Ok(self.header(CONTENT_TYPE, HeaderValue::from_static("application/json")).end(bytes))
    }

    pub fn is_finished(&self) -> bool {
        self.body.is_some()
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// The body written by the terminal write, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body.unwrap_or_default()));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }

    /// `true` when the response may still be modified.
    fn guard_finished(&self, what: &str) -> bool {
        if self.is_finished() {
            warn!(status = %self.status, what, "response already finished, ignoring write");
            return false;
        }
        true
    }
}

impl Default for Response {
    fn default() -> Self { Self::new() }
}
