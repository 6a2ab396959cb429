//! # quick
//!
//! A minimal HTTP framework: an ordered chain of middleware in front of an
//! exact-match router.
//!
//! Every request walks the chain one middleware at a time, in registration
//! order, then lands on exactly one handler chosen by method and path. That
//! is the whole model.
//!
//! - **Middleware** are tagged with how they continue: *terminal*
//!   (fire-and-forget, ends the chain), *continuation* (handed a single-use
//!   [`Next`]), or *deferred* (a future that gates the next step). See
//!   [`middleware`].
//! - **Routes** are `(GET | POST, exact path)` pairs. No parameters, no
//!   wildcards. An unmatched request gets `404` with an empty body.
//! - **Failures** never take the server down: a failing or panicking step
//!   becomes a `500` for that request only.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use quick::{App, BoxFuture, HandlerResult, Request, Response, Server, StatusCode, middleware};
//! use quick::handler::immediate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quick::Error> {
//!     let app = App::new()
//!         .with(middleware::trace())
//!         .with(middleware::json_body())
//!         .get("/", immediate(|_req, res| { res.end("hello"); Ok(()) }))
//!         .post("/", create);
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! fn create<'a>(req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult> {
//!     Box::pin(async move {
//!         let id = req.body().and_then(|b| b["id"].as_i64()).ok_or("missing `id`")?;
//!         res.status(StatusCode::CREATED).json(&serde_json::json!({ "id": id + 1 }))?;
//!         Ok(())
//!     })
//! }
//! ```

mod app;
mod error;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod handler;
pub mod middleware;
pub mod scheduler;

pub use app::App;
pub use error::{BoxError, Error};
pub use handler::{BoxFuture, Handler, HandlerResult};
pub use method::{Method, UnsupportedMethod};
pub use middleware::{Middleware, MiddlewareKind, Next};
pub use request::Request;
pub use response::Response;
pub use router::Router;
pub use server::Server;

pub use http::{HeaderMap, HeaderValue, StatusCode, header};
