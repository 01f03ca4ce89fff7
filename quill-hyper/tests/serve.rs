use std::net::SocketAddr;

use quill::wrap::JsonBody;
use quill::{App, Json, Request};
use quill_hyper::Server;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

async fn spawn(app: App, body_limit: usize) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let server = Server::new(app.build().unwrap()).body_limit(body_limit);
    tokio::spawn(server.serve(listener, async move {
        let _ = rx.await;
    }));

    (addr, tx)
}

fn app() -> App {
    App::new()
        .get("/", |_: Request| async { "Hello" })
        .post("/echo", |req: Request| async move {
            let params = req.params().clone();
            Json(json!({ "params": params }))
        })
        .wrap(JsonBody)
}

#[tokio::test]
async fn serves_text() {
    let (addr, _shutdown) = spawn(app(), 1024).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Hello");
}

#[tokio::test]
async fn serves_encoded_json() {
    let (addr, _shutdown) = spawn(app(), 1024).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/echo"))
        .form(&[("command", "/quote")])
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "params": { "command": "/quote" } }));
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (addr, _shutdown) = spawn(app(), 1024).await;

    let response = reqwest::get(format!("http://{addr}/missing")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let (addr, _shutdown) = spawn(app(), 16).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/echo"))
        .body(vec![b'x'; 64])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 413);
}
