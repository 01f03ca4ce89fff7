use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::error::BotError;
use crate::quotes::Quote;
use crate::rest::RestClient;

/// Body of a Slack incoming webhook post.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl WebhookMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            attachments: Vec::new(),
        }
    }

    pub fn attachment(attachment: Attachment) -> Self {
        Self {
            text: None,
            attachments: vec![attachment],
        }
    }
}

impl Attachment {
    pub fn for_quote(quote: &Quote) -> Self {
        Self {
            fallback: quote.render(),
            pretext: Some("Quote of the day".to_owned()),
            title: quote.author.clone(),
            title_link: None,
            text: quote.text.clone(),
            color: Some("#36a64f".to_owned()),
        }
    }
}

/// Somewhere a message can be posted.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, message: &WebhookMessage) -> Result<(), BotError>;
}

#[async_trait::async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn notify(&self, message: &WebhookMessage) -> Result<(), BotError> {
        (**self).notify(message).await
    }
}

pub struct Webhook {
    client: RestClient,
    url: SecretString,
}

impl Webhook {
    pub fn new(client: RestClient, url: SecretString) -> Self {
        Self { client, url }
    }
}

#[async_trait::async_trait]
impl Notifier for Webhook {
    async fn notify(&self, message: &WebhookMessage) -> Result<(), BotError> {
        self.client.post(self.url.expose_secret()).json(message).send().await?;
        tracing::info!(attachments = message.attachments.len(), "posted to webhook");
        Ok(())
    }
}
