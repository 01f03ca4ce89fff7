use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::BotError;
use crate::rest::RestClient;

pub const API_KEY_HEADER: &str = "X-TheySaidSo-Api-Secret";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Quote {
    #[serde(rename = "quote")]
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Quote {
    /// The quote as a single line of chat text.
    pub fn render(&self) -> String {
        match &self.author {
            Some(author) if !author.is_empty() => format!("{} ({})", self.text, author),
            _ => self.text.clone(),
        }
    }
}

/// Where quotes come from.
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync + 'static {
    async fn quote_of_the_day(&self, category: Option<&str>) -> Result<Quote, BotError>;
}

#[async_trait::async_trait]
impl<T: QuoteSource + ?Sized> QuoteSource for Arc<T> {
    async fn quote_of_the_day(&self, category: Option<&str>) -> Result<Quote, BotError> {
        (**self).quote_of_the_day(category).await
    }
}

/// The quote-of-the-day REST API.
pub struct QuotesClient {
    client: RestClient,
    base_url: String,
    api_key: Option<SecretString>,
}

impl QuotesClient {
    pub fn new(client: RestClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            api_key: None,
        }
    }

    pub fn api_key(mut self, api_key: Option<SecretString>) -> Self {
        self.api_key = api_key;
        self
    }
}

#[derive(Deserialize)]
struct QodResponse {
    contents: QodContents,
}

#[derive(Deserialize)]
struct QodContents {
    #[serde(default)]
    quotes: Vec<Quote>,
}

#[async_trait::async_trait]
impl QuoteSource for QuotesClient {
    async fn quote_of_the_day(&self, category: Option<&str>) -> Result<Quote, BotError> {
        let mut request = self.client.get(&format!("{}/qod.json", self.base_url));

        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.expose_secret());
        }

        let response: QodResponse = request.decode().await?;
        let quote = response.contents.quotes.into_iter().next().ok_or(BotError::NoQuote)?;

        tracing::debug!(category = ?quote.category, "fetched quote of the day");
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_first_quote() {
        let raw = r#"{
            "success": {"total": 1},
            "contents": {
                "quotes": [
                    {
                        "quote": "Stay hungry.",
                        "author": "Steve Jobs",
                        "category": "inspire",
                        "id": "x"
                    }
                ],
                "copyright": "2020"
            }
        }"#;

        let response: QodResponse = serde_json::from_str(raw).unwrap();
        let quote = &response.contents.quotes[0];

        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.author.as_deref(), Some("Steve Jobs"));
        assert_eq!(quote.render(), "Stay hungry. (Steve Jobs)");
    }

    #[test]
    fn render_without_author() {
        let quote = Quote {
            text: "Anon.".into(),
            author: None,
            category: None,
        };
        assert_eq!(quote.render(), "Anon.");
    }

    #[test]
    fn base_url_trailing_slash() {
        let client = RestClient::new(std::time::Duration::from_secs(1)).unwrap();
        let quotes = QuotesClient::new(client, "http://localhost:1/");
        assert_eq!(quotes.base_url, "http://localhost:1");
    }
}
