use crate::http::{Response, StatusCode};
use crate::Reject;

use thiserror::Error;

/// Errors raised while assembling requests, routes and responses.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid uri `{uri}`: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: http::uri::InvalidUri,
    },
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("failed to encode form: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),
    #[error("failed to decode query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
    #[error("failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Reject for Error {
    fn reject(self) -> Response {
        tracing::error!(error = %self, "internal error while handling request");
        Response::text("Internal Server Error").with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
