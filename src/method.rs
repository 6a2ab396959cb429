//! HTTP method as a typed enum.
//!
//! quick routes exactly two verbs, `GET` and `POST`. Anything else fails to
//! resolve with an [`UnsupportedMethod`], which the scheduler turns into a
//! `404` before any handler runs.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A routable HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get  => "GET",
            Self::Post => "POST",
        }
    }

    /// Resolves the method string carried by a request.
    ///
    /// Matching is case-insensitive. A request with no method at all is
    /// treated as `GET`.
    pub fn resolve(raw: &str) -> Result<Self, UnsupportedMethod> {
        if raw.is_empty() {
            return Ok(Self::Get);
        }
        raw.parse()
    }
}

/// Parses a method name, ignoring ASCII case (`"post"` → `Method::Post`).
impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Self::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Self::Post)
        } else {
            Err(UnsupportedMethod(s.to_owned()))
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request method outside the supported verb set.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("`{0}` is not a valid HTTP verb")]
pub struct UnsupportedMethod(String);

impl UnsupportedMethod {
    /// The method string as received.
    pub fn verb(&self) -> &str {
        &self.0
    }
}
