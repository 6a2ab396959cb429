//! Exact-match request router.
//!
//! One hash table per HTTP method, keyed by the request target exactly as
//! received. No parameters, no wildcards, no normalisation: `/foo/` is not
//! `/foo`, and a query string is part of the key.

use std::collections::HashMap;

use tracing::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// The route table.
///
/// Build it once at startup. Each builder call returns `self` so
/// registrations chain naturally; [`Router::register`] is the in-place form.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, HashMap<String, BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Stores `handler` under `(method, path)`. Last registration wins.
    pub fn register(&mut self, method: Method, path: impl Into<String>, handler: impl Handler) {
        let path = path.into();
        let replaced = self.routes
            .entry(method)
            .or_default()
            .insert(path.clone(), Box::new(handler))
            .is_some();
        if replaced {
            debug!(%method, %path, "route handler replaced");
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust
    /// # use quick::{Method, Router, handler::immediate};
    /// Router::new()
    ///     .on(Method::Get,  "/users", immediate(|_, res| { res.end("[]"); Ok(()) }))
    ///     .on(Method::Post, "/users", immediate(|_, res| { res.end("{}"); Ok(()) }));
    /// ```
    pub fn on(mut self, method: Method, path: impl Into<String>, handler: impl Handler) -> Self {
        self.register(method, path, handler);
        self
    }

    pub fn get(self, path: impl Into<String>, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: impl Into<String>, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Looks up the handler registered for `(method, path)`.
    pub fn resolve(&self, method: Method, path: &str) -> Option<&dyn Handler> {
        self.routes.get(&method)?.get(path).map(|h| &**h)
    }

    /// Number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::immediate;
    use crate::{Request, Response};

    fn writes(body: &'static str) -> impl Handler {
        immediate(move |_req, res| {
            res.end(body);
            Ok(())
        })
    }

    async fn body_of(router: &Router, method: Method, path: &str) -> Option<String> {
        let handler = router.resolve(method, path)?;
        let mut req = Request::new(method.as_str(), path);
        let mut res = Response::new();
        handler.call(&mut req, &mut res).await.unwrap();
        res.body().map(|b| String::from_utf8_lossy(b).into_owned())
    }

    #[tokio::test]
    async fn resolves_registered_route() {
        let router = Router::new().get("/", writes("root"));
        assert_eq!(body_of(&router, Method::Get, "/").await.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let mut router = Router::new().post("/items", writes("first"));
        router.register(Method::Post, "/items", writes("second"));

        assert_eq!(router.len(), 1);
        assert_eq!(body_of(&router, Method::Post, "/items").await.as_deref(), Some("second"));
    }

    #[test]
    fn methods_have_separate_tables() {
        let router = Router::new().get("/only-get", writes("x"));
        assert!(router.resolve(Method::Get, "/only-get").is_some());
        assert!(router.resolve(Method::Post, "/only-get").is_none());
    }

    #[test]
    fn paths_match_exactly() {
        let router = Router::new()
            .get("/foo", writes("foo"))
            .get("/search?q=rust", writes("search"));

        assert!(router.resolve(Method::Get, "/foo").is_some());
        assert!(router.resolve(Method::Get, "/foo/").is_none());
        assert!(router.resolve(Method::Get, "/FOO").is_none());
        assert!(router.resolve(Method::Get, "/foo?x=1").is_none());
        assert!(router.resolve(Method::Get, "/search?q=rust").is_some());
        assert!(router.resolve(Method::Get, "/search?q=Rust").is_none());
        assert!(router.resolve(Method::Get, "/search").is_none());
    }

    #[test]
    fn empty_router() {
        let router = Router::default();
        assert!(router.is_empty());
        assert!(router.resolve(Method::Get, "/").is_none());
    }
}
