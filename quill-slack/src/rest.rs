//! A thin wrapper over `reqwest` shared by the outbound collaborators.
//!
//! Failures are sorted into two families: the remote could not be reached
//! (timeout, refused connection, broken transport) or it answered with
//! something unusable (non-2xx status, undecodable body). Callers pick the
//! status code they report from [`ClientError::is_unreachable`].

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Upper bound on how much of an error body is kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {target} timed out")]
    Timeout { target: String },
    #[error("could not connect to {target}: {source}")]
    Connect {
        target: String,
        source: reqwest::Error,
    },
    #[error("{target} answered with {status}")]
    Status {
        target: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not decode response from {target}: {source}")]
    Decode { target: String, source: BoxError },
    #[error("request to {target} failed: {source}")]
    Transport {
        target: String,
        source: reqwest::Error,
    },
    #[error("invalid request: {0}")]
    Build(String),
}

impl ClientError {
    /// Whether the remote was never reached, as opposed to answering badly.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connect { .. } | Self::Transport { .. }
        )
    }

    fn classify(target: &str, err: reqwest::Error) -> Self {
        let target = target.to_owned();
        if err.is_timeout() {
            Self::Timeout { target }
        } else if err.is_connect() {
            Self::Connect {
                target,
                source: err,
            }
        } else if err.is_decode() {
            Self::Decode {
                target,
                source: Box::new(err),
            }
        } else if err.is_builder() {
            Self::Build(err.to_string())
        } else {
            Self::Transport {
                target,
                source: err,
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct RestClient {
    inner: reqwest::Client,
}

impl RestClient {
    /// Every request made through this client is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("quill-slack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;

        Ok(Self { inner })
    }

    pub fn get(&self, url: &str) -> RestRequest {
        RestRequest::new(self.inner.get(url), url)
    }

    pub fn post(&self, url: &str) -> RestRequest {
        RestRequest::new(self.inner.post(url), url)
    }
}

/// A request under construction.
pub struct RestRequest {
    builder: reqwest::RequestBuilder,
    target: String,
}

impl RestRequest {
    fn new(builder: reqwest::RequestBuilder, url: &str) -> Self {
        Self {
            builder,
            target: origin(url),
        }
    }

    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        self.builder = self.builder.query(query);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    pub fn form<T: Serialize + ?Sized>(mut self, form: &T) -> Self {
        self.builder = self.builder.form(form);
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, json: &T) -> Self {
        self.builder = self.builder.json(json);
        self
    }

    /// Send the request, failing on anything but a 2xx answer.
    pub async fn send(self) -> Result<reqwest::Response, ClientError> {
        let target = self.target;
        let response = self
            .builder
            .send()
            .await
            .map_err(|err| ClientError::classify(&target, err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > ERROR_BODY_LIMIT {
            let mut end = ERROR_BODY_LIMIT;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }

        tracing::debug!(%target, %status, "remote answered with an error status");
        Err(ClientError::Status {
            target,
            status,
            body,
        })
    }

    pub async fn text(self) -> Result<String, ClientError> {
        let target = self.target.clone();
        self.send()
            .await?
            .text()
            .await
            .map_err(|err| ClientError::classify(&target, err))
    }

    /// Read the whole body, then parse it as JSON. Failing to read the body
    /// (a stalled or dropped connection) is not a decode error.
    pub async fn decode<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let target = self.target.clone();
        let bytes = self
            .send()
            .await?
            .bytes()
            .await
            .map_err(|err| ClientError::classify(&target, err))?;

        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode {
            target,
            source: Box::new(err),
        })
    }
}

// Only the origin is kept for errors and logs, webhook paths carry secrets.
fn origin(url: &str) -> String {
    Url::parse(url)
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_else(|_| "<invalid url>".to_owned())
}
