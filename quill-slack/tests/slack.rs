use std::sync::{Arc, Mutex};

use quill::http::{header, Method, StatusCode};
use quill::{Body, Pipeline, Request, Response};
use quill_slack::quotes::{Quote, QuoteSource};
use quill_slack::rest::ClientError;
use quill_slack::webhook::{Notifier, WebhookMessage};
use quill_slack::{app, Bot, BotError, Environment};
use secrecy::SecretString;
use serde_json::{json, Value};

const TOKEN: &str = "xoxb-test";

struct StubQuotes {
    categories: Arc<Mutex<Vec<Option<String>>>>,
}

#[async_trait::async_trait]
impl QuoteSource for StubQuotes {
    async fn quote_of_the_day(&self, category: Option<&str>) -> Result<Quote, BotError> {
        self.categories.lock().unwrap().push(category.map(str::to_owned));
        Ok(Quote {
            text: "Talk is cheap. Show me the code.".into(),
            author: Some("Linus Torvalds".into()),
            category: category.map(str::to_owned),
        })
    }
}

struct Unreachable;

#[async_trait::async_trait]
impl QuoteSource for Unreachable {
    async fn quote_of_the_day(&self, _: Option<&str>) -> Result<Quote, BotError> {
        Err(ClientError::Timeout {
            target: "http://quotes".into(),
        }
        .into())
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<WebhookMessage>>>);

#[async_trait::async_trait]
impl Notifier for Recorder {
    async fn notify(&self, message: &WebhookMessage) -> Result<(), BotError> {
        self.0.lock().unwrap().push(message.clone());
        Ok(())
    }
}

fn pipeline(bot: Bot) -> Pipeline {
    app(bot, SecretString::from(TOKEN), Environment::Production).build().unwrap()
}

fn stub() -> (Bot, Arc<Mutex<Vec<Option<String>>>>) {
    let categories = Arc::new(Mutex::new(Vec::new()));
    let quotes = StubQuotes {
        categories: Arc::clone(&categories),
    };
    (Bot::new(quotes), categories)
}

fn slash(fields: &[(&str, &str)]) -> Request {
    Request::builder()
        .method(Method::POST)
        .uri("/slack")
        .form(fields)
        .build()
        .unwrap()
}

fn json_body(response: &Response) -> Value {
    match &response.body {
        Body::Bytes(bytes) => serde_json::from_slice(bytes).unwrap(),
        other => panic!("expected an encoded body, got {other:?}"),
    }
}

#[tokio::test]
async fn quote_command_replies_in_channel() {
    let (bot, categories) = stub();
    let response = pipeline(bot)
        .serve(slash(&[("token", TOKEN), ("command", "/quote"), ("team_id", "T1")]))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        Some("application/json; charset=utf-8")
    );

    let body = json_body(&response);
    assert_eq!(body["response_type"], "in_channel");
    assert!(body["text"].as_str().unwrap().contains("Talk is cheap. Show me the code."));
    assert_eq!(*categories.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn category_is_passed_through() {
    let (bot, categories) = stub();
    let response = pipeline(bot)
        .serve(slash(&[("token", TOKEN), ("command", "/quote"), ("text", "inspire")]))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(*categories.lock().unwrap(), vec![Some("inspire".to_owned())]);
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let (bot, categories) = stub();
    let response = pipeline(bot)
        .serve(slash(&[("token", "wrong"), ("command", "/quote")]))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, Body::from("Invalid token"));
    assert!(categories.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_command_is_ephemeral() {
    let (bot, _) = stub();
    let response = pipeline(bot)
        .serve(slash(&[("token", TOKEN), ("command", "/weather")]))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = json_body(&response);
    assert_eq!(body["response_type"], "ephemeral");
    assert!(body["text"].as_str().unwrap().contains("/weather"));
}

#[tokio::test]
async fn share_posts_to_the_webhook() {
    let (bot, _) = stub();
    let recorder = Recorder::default();
    let response = pipeline(bot.notifier(recorder.clone()))
        .serve(slash(&[("token", TOKEN), ("command", "/quote"), ("text", "share funny")]))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(json_body(&response)["response_type"], "ephemeral");

    let posted = recorder.0.lock().unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].attachments[0].text, "Talk is cheap. Show me the code.");
    assert_eq!(posted[0].attachments[0].title.as_deref(), Some("Linus Torvalds"));
}

#[tokio::test]
async fn share_without_webhook_explains() {
    let (bot, _) = stub();
    let response = pipeline(bot)
        .serve(slash(&[("token", TOKEN), ("command", "/quote"), ("text", "share")]))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = json_body(&response);
    assert_eq!(body["response_type"], "ephemeral");
    assert!(body["text"].as_str().unwrap().contains("webhook"));
}

#[tokio::test]
async fn unreachable_quotes_service() {
    let response = pipeline(Bot::new(Unreachable))
        .serve(slash(&[("token", TOKEN), ("command", "/quote")]))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn non_form_body_is_unsupported() {
    let (bot, _) = stub();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/slack?token=xoxb-test")
        .json(&json!({ "command": "/quote" }))
        .build()
        .unwrap();

    let response = pipeline(bot).serve(request).await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn root_and_not_found() {
    let (bot, _) = stub();
    let pipeline = pipeline(bot);

    let root = pipeline.serve(Request::builder().uri("/").build().unwrap()).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body, Body::from(quill_slack::routes::GREETING));

    let missing = pipeline
        .serve(Request::builder().method(Method::GET).uri("/slack").build().unwrap())
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let dump = pipeline.serve(Request::builder().uri("/dump/x").build().unwrap()).await;
    assert_eq!(dump.status, StatusCode::NOT_FOUND);
}

#[cfg(feature = "dump-route")]
#[tokio::test]
async fn dump_route_in_development() {
    let (bot, _) = stub();
    let pipeline = app(bot, SecretString::from(TOKEN), Environment::Development).build().unwrap();

    let response = pipeline
        .serve(Request::builder().uri("/dump/a/b?x=1").build().unwrap())
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = json_body(&response);
    assert_eq!(body["path"], "/dump/a/b");
    assert_eq!(body["query"]["x"], "1");
}
