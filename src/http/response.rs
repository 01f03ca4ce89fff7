use super::{header, Body, HeaderMap, HeaderName, HeaderValue, StatusCode};
use crate::Error;

use serde::Serialize;

/// An HTTP response.
///
/// Fields are public so middleware can adjust a response on its way out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// The response's status
    pub status: StatusCode,

    /// The response's headers
    pub headers: HeaderMap,

    /// The response body
    pub body: Body,
}

impl Response {
    /// An empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Response {
            status,
            ..Default::default()
        }
    }

    /// A `200 OK` plain text response.
    pub fn text(text: impl Into<String>) -> Self {
        Response::default()
            .with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )
            .with_body(Body::Text(text.into()))
    }

    /// A `200 OK` response carrying a structured body.
    ///
    /// The value is serialized to bytes later, by the
    /// [`JsonBody`](crate::wrap::JsonBody) middleware.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(value)?;
        Ok(Response::default().with_body(Body::Json(value)))
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// The value of a header, if present and valid UTF-8.
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}
