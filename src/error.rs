//! Unified error type.

use std::net::AddrParseError;

use thiserror::Error;

use crate::method::Method;

/// Boxed error returned by middleware and handlers.
///
/// Anything implementing `std::error::Error + Send + Sync` converts into it
/// with `?`, and so does a plain `&str`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by quick's fallible operations.
///
/// Unmatched routes and unsupported verbs are not `Error`s: the router answers
/// them with a `404` [`Response`](crate::Response). This type surfaces
/// infrastructure failures (binding, accepting) and failures raised by
/// middleware or handlers while a request walks the chain.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid socket address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A middleware future resolved to an error.
    #[error("middleware `{name}` failed: {source}")]
    Middleware {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The routed handler returned an error.
    #[error("handler for {method} {path} failed: {source}")]
    Handler {
        method: Method,
        path: String,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Wraps a middleware failure, passing already-typed errors through.
    ///
    /// A continuation middleware that propagates the result of `next.run(..)`
    /// with `?` hands back an `Error` raised further down the chain. That one
    /// is returned as-is so the innermost failing step keeps the blame.
    pub(crate) fn middleware(name: &str, source: BoxError) -> Self {
        match source.downcast::<Error>() {
            Ok(inner) => *inner,
            Err(source) => Self::Middleware { name: name.to_owned(), source },
        }
    }
}
