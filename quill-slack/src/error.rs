use quill::http::{Response, StatusCode};
use quill::Reject;
use thiserror::Error;

use crate::rest::ClientError;

/// A collaborator failed while answering a slash command.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("the quotes service returned no quote")]
    NoQuote,
    #[error("no incoming webhook is configured")]
    WebhookNotConfigured,
}

impl BotError {
    pub fn status(&self) -> StatusCode {
        match self {
            BotError::Client(err) if err.is_unreachable() => StatusCode::SERVICE_UNAVAILABLE,
            BotError::Client(_) | BotError::NoQuote => StatusCode::BAD_GATEWAY,
            BotError::WebhookNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Reject for BotError {
    fn reject(self) -> Response {
        let status = self.status();
        tracing::warn!(error = %self, %status, "collaborator failure");

        let message = match &self {
            BotError::Client(err) if err.is_unreachable() => {
                "A remote service is unreachable, try again later."
            }
            BotError::Client(_) | BotError::NoQuote => {
                "A remote service returned an unusable answer."
            }
            BotError::WebhookNotConfigured => "The bot is not configured for this command.",
        };
        Response::text(message).with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_failures_to_statuses() {
        let unreachable = BotError::from(ClientError::Timeout {
            target: "http://q".into(),
        });
        assert_eq!(unreachable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bad = BotError::from(ClientError::Status {
            target: "http://q".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        });
        assert_eq!(bad.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(BotError::NoQuote.reject().status, StatusCode::BAD_GATEWAY);
    }
}
