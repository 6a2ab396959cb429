//! Minimal quick application: tracing, JSON body parsing, a deferred delay.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example quick
//!
//! Try:
//!   curl http://localhost:3000/
//!   curl -X POST http://localhost:3000/ -d '{"id":5}'
//!   curl -i http://localhost:3000/missing

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use quick::handler::immediate;
use quick::middleware::{self, MiddlewareResult};
use quick::{App, BoxFuture, Middleware, Request, Response, Server, StatusCode};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// When the request cleared the delay middleware, in milliseconds since the epoch.
#[derive(Clone, Copy)]
struct Timestamp(u128);

#[tokio::main]
async fn main() -> Result<(), quick::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = App::new()
        .with_all([
            middleware::trace(),
            middleware::json_body(),
            Middleware::deferred("delay", delay),
        ])
        .get("/", immediate(|_req, res| {
            res.end("hello");
            Ok(())
        }))
        .post("/", immediate(|req, res| {
            let id = req.body()
                .and_then(|b| b.get("id"))
                .and_then(Value::as_i64)
                .ok_or("body must carry a numeric `id`")?;
            let timestamp = req.extensions().get::<Timestamp>().map(|t| t.0 as u64);
            res.status(StatusCode::OK).json(&json!({ "id": id + 1, "timestamp": timestamp }))?;
            Ok(())
        }));

    Server::bind("0.0.0.0:3000")?.serve(app).await
}

/// Holds every request for a second, then stamps it.
fn delay<'a>(req: &'a mut Request, _res: &'a mut Response) -> BoxFuture<'a, MiddlewareResult> {
    Box::pin(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        req.extensions_mut().insert(Timestamp(now));
        Ok(())
    })
}
