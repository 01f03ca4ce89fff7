use std::convert::Infallible;

use crate::http::{header, Bytes, HeaderValue, Response, StatusCode};
use crate::reject::{IntoRejection, Rejection};
use crate::Error;

use serde::Serialize;
use serde_json::Value;

/// A type that can be converted into an HTTP response.
pub trait Respond {
    /// An error that can occur during the conversion.
    type Rejection: IntoRejection;

    /// Convert into an HTTP response.
    fn respond(self) -> Result<Response, Self::Rejection>;

    /// Returns a new responder that adds the provided status
    /// code to the response.
    fn with_status(self, status: StatusCode) -> (StatusCode, Self)
    where
        Self: Sized,
    {
        (status, self)
    }
}

impl Respond for () {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(Response::default())
    }
}

impl Respond for Response {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(self)
    }
}

impl Respond for StatusCode {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(Response::new(self))
    }
}

impl<T> Respond for (StatusCode, T)
where
    T: Respond,
{
    type Rejection = T::Rejection;

    fn respond(self) -> Result<Response, T::Rejection> {
        self.1.respond().map(|response| response.with_status(self.0))
    }
}

impl<T, E> Respond for Result<T, E>
where
    T: Respond,
    E: IntoRejection,
{
    type Rejection = Rejection;

    fn respond(self) -> Result<Response, Rejection> {
        self.map_err(Rejection::new)
            .and_then(|ok| ok.respond().map_err(Rejection::new))
    }
}

impl Respond for Value {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(Response::default().with_body(self))
    }
}

/// Respond with a structured body built from any serializable value.
///
/// ```
/// use quill::{Json, Request};
///
/// async fn hello(_: Request) -> Json<Vec<&'static str>> {
///     Json(vec!["hello", "world"])
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T: Serialize> Respond for Json<T> {
    type Rejection = Error;

    fn respond(self) -> Result<Response, Error> {
        Response::json(&self.0)
    }
}

macro_rules! with_body {
    ($($ty:ty $(|$into:ident)?),* $(,)?) => { $(
        impl Respond for $ty {
            type Rejection = Infallible;

            fn respond(self) -> Result<Response, Infallible> {
                Ok(Response::default()
                    .with_header(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/octet-stream"),
                    )
                    .with_body(self $(.$into())?))
            }
        })*
    }
}

with_body! {
    Bytes,
    Vec<u8>,
    &'static [u8] | to_vec,
}

impl Respond for String {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(Response::text(self))
    }
}

impl Respond for &'static str {
    type Rejection = Infallible;

    fn respond(self) -> Result<Response, Infallible> {
        Ok(Response::text(self))
    }
}
