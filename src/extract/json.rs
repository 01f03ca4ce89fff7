use crate::http::{Request, Response, StatusCode};
use crate::Reject;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Deserialize the given type as JSON from the request body.
pub fn json<T>(req: &Request) -> Result<T, JsonRejection>
where
    T: DeserializeOwned,
{
    if !is_json(req) {
        return Err(JsonRejection::ContentType);
    }

    serde_json::from_slice(req.body()).map_err(JsonRejection::Deser)
}

fn is_json(req: &Request) -> bool {
    match req.content_type() {
        Some(mime) => mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON),
        None => false,
    }
}

/// The error returned by [`extract::json`](json) if extraction fails.
#[derive(Debug, Error)]
pub enum JsonRejection {
    #[error("expected content-type application/json")]
    ContentType,
    #[error("failed to deserialize body: {0}")]
    Deser(serde_json::Error),
}

impl Reject for JsonRejection {
    fn reject(self) -> Response {
        let status = match self {
            JsonRejection::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            JsonRejection::Deser(_) => StatusCode::BAD_REQUEST,
        };

        Response::text(self.to_string()).with_status(status)
    }
}
