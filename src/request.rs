//! Incoming request context.
//!
//! One `Request` is built per incoming HTTP request and handed by mutable
//! reference to every middleware in the chain and finally to the handler.
//! Earlier steps may attach data (a parsed JSON body, typed extensions) for
//! later ones to read.

use std::net::SocketAddr;

use bytes::Bytes;
use http::{Extensions, HeaderMap};
use serde_json::Value;

/// An incoming HTTP request.
#[derive(Debug)]
pub struct Request {
    method: String,
    url: String,
    headers: HeaderMap,
    raw_body: Bytes,
    body: Option<Value>,
    remote_addr: Option<SocketAddr>,
    extensions: Extensions,
}

impl Request {
    /// Creates a request with no headers and an empty body.
    ///
    /// `url` is the request target as received: path plus query string.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HeaderMap::new(),
            raw_body: Bytes::new(),
            body: None,
            remote_addr: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.raw_body = body.into();
        self
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// The method exactly as received. Not normalised.
    pub fn method(&self) -> &str { &self.method }
    pub fn url(&self) -> &str { &self.url }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn raw_body(&self) -> &Bytes { &self.raw_body }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }

    /// Case-insensitive header lookup. Non-UTF-8 values are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The parsed body, if a body-parsing middleware attached one.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// Typed per-request data attached by middleware.
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }
}
