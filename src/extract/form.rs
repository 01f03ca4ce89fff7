use crate::http::{Request, Response, StatusCode};
use crate::Reject;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Deserialize the given type from a URL encoded form body.
///
/// Unknown fields are ignored unless the target type opts into
/// `#[serde(deny_unknown_fields)]`.
pub fn form<T>(req: &Request) -> Result<T, FormRejection>
where
    T: DeserializeOwned,
{
    if !is_url_encoded(req) {
        return Err(FormRejection::ContentType);
    }

    serde_urlencoded::from_bytes(req.body()).map_err(FormRejection::Deser)
}

fn is_url_encoded(req: &Request) -> bool {
    req.content_type()
        .map(|mime| mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
        .unwrap_or(false)
}

/// The error returned by [`extract::form`](form) if extraction fails.
#[derive(Debug, Error)]
pub enum FormRejection {
    #[error("expected content-type application/x-www-form-urlencoded")]
    ContentType,
    #[error("failed to deserialize body: {0}")]
    Deser(serde_urlencoded::de::Error),
}

impl Reject for FormRejection {
    fn reject(self) -> Response {
        let status = match self {
            FormRejection::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            FormRejection::Deser(_) => StatusCode::BAD_REQUEST,
        };

        Response::text(self.to_string()).with_status(status)
    }
}
