use crate::http::{header, Body, HeaderValue, Request, Response};
use crate::wrap::{Next, Wrap};

use std::convert::Infallible;

const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";

/// Encodes structured response bodies as JSON.
///
/// Responses whose body is [`Body::Json`] are serialized to bytes and get a
/// `content-type: application/json; charset=utf-8` header. Every other
/// response passes through untouched. Rejections from further down the
/// chain are turned into responses first, so their bodies are encoded too.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody;

#[crate::async_trait]
impl Wrap for JsonBody {
    type Rejection = Infallible;

    async fn call(&self, req: Request, next: &dyn Next) -> Result<Response, Infallible> {
        let response = match next.call(req).await {
            Ok(response) => response,
            Err(rejection) => rejection.reject(),
        };

        Ok(encode_json(response))
    }
}

/// Serialize a structured response body, leaving other bodies alone.
///
/// Values that cannot be represented as JSON are caught earlier, when the
/// handler builds the body with [`Response::json`].
pub fn encode_json(mut response: Response) -> Response {
    if let Body::Json(value) = &response.body {
        response.body = Body::Bytes(value.to_string().into());
        response.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JSON_UTF8),
        );
    }

    response
}
