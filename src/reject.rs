use crate::http::{Response, StatusCode};

use std::convert::Infallible;
use std::fmt;

/// A per-request failure that knows which response it turns into.
///
/// Extractor errors, collaborator failures and middleware short-circuits
/// all implement this. Handlers return them as [`Rejection`]s and the
/// [`Pipeline`](crate::Pipeline) converts whatever is left into a response.
pub trait Reject: fmt::Debug + fmt::Display + Send {
    fn reject(self) -> Response;
}

impl Reject for StatusCode {
    fn reject(self) -> Response {
        Response::new(self)
    }
}

impl Reject for Infallible {
    fn reject(self) -> Response {
        match self {}
    }
}

/// Any [`Reject`] type, boxed.
pub struct Rejection(Box<dyn Erased>);

impl Rejection {
    pub fn new<E: IntoRejection>(err: E) -> Self {
        err.into_rejection()
    }

    /// The response for this rejection. `Rejection` cannot implement
    /// [`Reject`] itself without overlapping the `From` impl below.
    pub fn reject(self) -> Response {
        self.0.into_response()
    }
}

trait Erased: fmt::Debug + fmt::Display + Send {
    fn into_response(self: Box<Self>) -> Response;
}

impl<T: Reject> Erased for T {
    fn into_response(self: Box<Self>) -> Response {
        (*self).reject()
    }
}

impl fmt::Debug for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E: Reject + 'static> From<E> for Rejection {
    fn from(err: E) -> Self {
        Rejection(Box::new(err))
    }
}

/// Values a handler or middleware may fail with.
///
/// Besides every [`Reject`] type this covers [`Rejection`] itself and a
/// ready-made [`Response`], which is sent as is.
pub trait IntoRejection {
    fn into_rejection(self) -> Rejection;
}

impl<E: Reject + 'static> IntoRejection for E {
    fn into_rejection(self) -> Rejection {
        Rejection::from(self)
    }
}

impl IntoRejection for Rejection {
    fn into_rejection(self) -> Rejection {
        self
    }
}

impl IntoRejection for Response {
    fn into_rejection(self) -> Rejection {
        Rejection::from(Verbatim(self))
    }
}

#[derive(Debug)]
struct Verbatim(Response);

impl fmt::Display for Verbatim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.0.status)
    }
}

impl Reject for Verbatim {
    fn reject(self) -> Response {
        self.0
    }
}
