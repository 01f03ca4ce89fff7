use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use quill::http::{header, Method, StatusCode};
use quill::wrap::{JsonBody, TokenCheck, Trace};
use quill::{App, Body, Handler, Json, Pipeline, Request, Response};
use secrecy::SecretString;
use serde_json::{json, Value};

const SECRET: &str = "s3cr3t";

fn counting_handler(calls: &Arc<AtomicUsize>) -> impl Handler {
    let calls = calls.clone();
    move |_: Request| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Response::text("handled").with_status(StatusCode::ACCEPTED) }
    }
}

fn protected(calls: &Arc<AtomicUsize>) -> Pipeline {
    App::new()
        .post(
            "/slack",
            counting_handler(calls).wrap(TokenCheck::new(SecretString::from(SECRET))),
        )
        .wrap(Trace)
        .wrap(JsonBody)
        .build()
        .unwrap()
}

fn slash(token: &str) -> Request {
    Request::builder()
        .method(Method::POST)
        .uri("/slack")
        .form(&[("command", "/quote"), ("token", token)])
        .build()
        .unwrap()
}

#[tokio::test]
async fn wrong_token_is_rejected_before_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = protected(&calls);

    for token in ["wrong", "", "S3CR3T", "s3cr3t "] {
        let response = pipeline.serve(slash(token)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, Body::from("Invalid token"));
    }

    let missing = Request::builder()
        .method(Method::POST)
        .uri("/slack")
        .form(&[("command", "/quote")])
        .build()
        .unwrap();
    assert_eq!(pipeline.serve(missing).await.status, StatusCode::BAD_REQUEST);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn matching_token_reaches_the_handler_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = protected(&calls);

    let response = pipeline.serve(slash(SECRET)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body, Body::from("handled"));
}

#[tokio::test]
async fn token_in_query_string_is_accepted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = protected(&calls);

    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/slack?token={SECRET}"))
        .build()
        .unwrap();

    assert_eq!(pipeline.serve(req).await.status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn unmatched_requests_are_not_found_whatever_the_body() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = protected(&calls);

    let requests = [
        Request::builder().uri("/slack").build().unwrap(),
        Request::builder().method(Method::POST).uri("/nope").body("junk").build().unwrap(),
        Request::builder()
            .method(Method::DELETE)
            .uri("/slack")
            .form(&[("token", SECRET)])
            .build()
            .unwrap(),
    ];

    for req in requests {
        let response = pipeline.serve(req).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, Body::Empty);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn structured_bodies_are_served_as_json() {
    let value = json!({
        "text": "quote",
        "attachments": [{ "title": "Quote of the day", "color": "#36a64f" }],
    });

    let served = value.clone();
    let pipeline = App::new()
        .get("/", move |_: Request| {
            let value = served.clone();
            async move { Json(value) }
        })
        .wrap(JsonBody)
        .build()
        .unwrap();

    let response = pipeline.serve(Request::builder().build().unwrap()).await;

    assert_eq!(
        response.header(header::CONTENT_TYPE),
        Some("application/json; charset=utf-8")
    );
    let decoded: Value = serde_json::from_slice(response.body.as_bytes().unwrap()).unwrap();
    assert_eq!(decoded, value);
}

#[tokio::test]
async fn text_bodies_pass_through_encoding_untouched() {
    let bare = App::new()
        .get("/", |_: Request| async { "plain" })
        .build()
        .unwrap();
    let encoded = App::new()
        .get("/", |_: Request| async { "plain" })
        .wrap(JsonBody)
        .build()
        .unwrap();

    let expected = bare.serve(Request::builder().build().unwrap()).await;
    let actual = encoded.serve(Request::builder().build().unwrap()).await;
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn invalid_patterns_fail_the_build() {
    let result = App::new()
        .get("/ok", |_: Request| async { "ok" })
        .get("no-slash", |_: Request| async { "bad" })
        .build();

    assert!(matches!(result, Err(quill::Error::InvalidPattern { .. })));
}

#[tokio::test]
async fn unserializable_bodies_are_internal_errors() {
    let pipeline = App::new()
        .get("/", |_: Request| async {
            let mut by_pair = BTreeMap::new();
            by_pair.insert((1, 2), "tuple keys have no json form");
            Json(by_pair)
        })
        .wrap(Trace)
        .wrap(JsonBody)
        .build()
        .unwrap();

    let response = pipeline.serve(Request::builder().build().unwrap()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, Body::from("Internal Server Error"));
}
