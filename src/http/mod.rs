//! HTTP request and response types.

mod body;
mod request;
mod response;

pub use body::Body;
pub use request::{Params, Request, RequestBuilder};
pub use response::Response;

pub use bytes::Bytes;
pub use http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
