mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{TestServer, send};
use quick::handler::immediate;
use quick::middleware::{self, MiddlewareResult};
use quick::{App, BoxFuture, Middleware, Request, Response, StatusCode};
use serde_json::{Value, json};

fn app() -> App {
    App::new()
        .with(middleware::trace())
        .with(middleware::json_body())
        .get("/", immediate(|_req, res| {
            res.end("hello");
            Ok(())
        }))
        .post("/", immediate(|req, res| {
            let id = req.body()
                .and_then(|b| b.get("id"))
                .and_then(Value::as_i64)
                .ok_or("missing numeric `id`")?;
            res.status(StatusCode::OK).json(&json!({ "id": id + 1 }))?;
            Ok(())
        }))
}

#[tokio::test]
async fn get_root_returns_hello() {
    let server = TestServer::start(app()).await;

    let reply = send(server.addr, "GET", "/", "").await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), "hello");

    server.stop().await;
}

#[tokio::test]
async fn post_root_increments_id() {
    let server = TestServer::start(app()).await;

    let reply = send(server.addr, "POST", "/", r#"{"id": 5}"#).await;
    assert_eq!(reply.status, 200);
    assert!(reply.head.to_ascii_lowercase().contains("content-type: application/json"));
    let body: Value = serde_json::from_slice(&reply.body).unwrap();
    assert_eq!(body["id"], 6);

    server.stop().await;
}

#[tokio::test]
async fn unknown_path_is_404_with_empty_body() {
    let server = TestServer::start(app()).await;

    let reply = send(server.addr, "GET", "/missing", "").await;
    assert_eq!(reply.status, 404);
    assert!(reply.body.is_empty());

    let reply = send(server.addr, "GET", "/?trailing=query", "").await;
    assert_eq!(reply.status, 404);

    server.stop().await;
}

#[tokio::test]
async fn unsupported_verb_is_rejected_without_killing_the_server() {
    let server = TestServer::start(app()).await;

    let reply = send(server.addr, "DELETE", "/", "").await;
    assert_eq!(reply.status, 404);
    assert!(reply.body.is_empty());

    let reply = send(server.addr, "GET", "/", "").await;
    assert_eq!(reply.status, 200);

    server.stop().await;
}

#[tokio::test]
async fn malformed_json_is_400() {
    let server = TestServer::start(app()).await;

    let reply = send(server.addr, "POST", "/", "{oops").await;
    assert_eq!(reply.status, 400);

    server.stop().await;
}

fn boom<'a>(req: &'a mut Request, _res: &'a mut Response) -> BoxFuture<'a, MiddlewareResult> {
    Box::pin(async move {
        if req.url() == "/panic" {
            panic!("middleware blew up");
        }
        Ok(())
    })
}

#[tokio::test]
async fn panicking_request_gets_500_and_others_still_succeed() {
    let app = app().with(Middleware::deferred("boom", boom));
    let server = TestServer::start(app).await;

    let reply = send(server.addr, "GET", "/panic", "").await;
    assert_eq!(reply.status, 500);

    let reply = send(server.addr, "GET", "/", "").await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.text(), "hello");

    server.stop().await;
}

#[tokio::test]
async fn terminal_middleware_stops_before_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let app = App::new()
        .with(Middleware::terminal("logger", move |_req, _res| {
            seen.fetch_add(1, Ordering::SeqCst);
        }))
        .get("/", immediate(|_req, _res| panic!("handler must not run")));
    let server = TestServer::start(app).await;

    let reply = send(server.addr, "GET", "/", "").await;
    assert_eq!(reply.status, 500);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    server.stop().await;
}

#[tokio::test]
async fn concurrent_requests_are_isolated() {
    let server = TestServer::start(app()).await;
    let addr = server.addr;

    let requests = (0..16).map(|i| {
        tokio::spawn(async move {
            let reply = send(addr, "POST", "/", &format!(r#"{{"id": {i}}}"#)).await;
            let body: Value = serde_json::from_slice(&reply.body).unwrap();
            (reply.status, body["id"].as_i64())
        })
    });

    for (i, handle) in requests.collect::<Vec<_>>().into_iter().enumerate() {
        let (status, id) = handle.await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(id, Some(i as i64 + 1));
    }

    server.stop().await;
}
