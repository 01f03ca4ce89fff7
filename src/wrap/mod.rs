//! Asynchronous middleware.

mod json;
mod token;
mod trace;
mod wrap_fn;

pub use json::{encode_json, JsonBody};
pub use token::TokenCheck;
pub use trace::Trace;
pub use wrap_fn::{wrap_fn, WrapFn};

use crate::bounded::BoxFuture;
use crate::handler::{BoxHandler, Handler};
use crate::http::{Request, Response};
use crate::reject::IntoRejection;
use crate::Rejection;

/// Middleware that wraps around the rest of the chain.
///
/// A middleware either calls `next`, possibly with a modified request, or
/// short-circuits by returning its own response, in which case nothing
/// further down the chain runs.
///
/// ```
/// use quill::{async_trait, Next, Rejection, Request, Response, Wrap};
///
/// struct Teapot;
///
/// #[async_trait]
/// impl Wrap for Teapot {
///     type Rejection = Rejection;
///
///     async fn call(&self, req: Request, next: &dyn Next) -> Result<Response, Rejection> {
///         if req.path() == "/coffee" {
///             return Ok(Response::new(quill::http::StatusCode::IM_A_TEAPOT));
///         }
///         next.call(req).await
///     }
/// }
/// ```
#[crate::async_trait]
pub trait Wrap: Send + Sync + 'static {
    /// An error that can occur when calling this middleware.
    type Rejection: IntoRejection;

    /// Call the middleware with a request, and the next
    /// handler in the chain.
    async fn call(&self, req: Request, next: &dyn Next) -> Result<Response, Self::Rejection>;
}

/// The next handler in the middleware chain.
#[crate::async_trait]
pub trait Next: Send + Sync {
    /// Call the handler with the request.
    async fn call(&self, req: Request) -> Result<Response, Rejection>;
}

/// A type-erased [`Wrap`].
pub struct BoxWrap(Box<dyn ErasedWrap>);

impl BoxWrap {
    pub fn new<W>(wrap: W) -> Self
    where
        W: Wrap,
    {
        BoxWrap(Box::new(wrap))
    }
}

#[crate::async_trait]
impl Wrap for BoxWrap {
    type Rejection = Rejection;

    async fn call(&self, req: Request, next: &dyn Next) -> Result<Response, Rejection> {
        self.0.call_erased(req, next).await
    }
}

trait ErasedWrap: Send + Sync + 'static {
    fn call_erased<'a>(
        &'a self,
        req: Request,
        next: &'a dyn Next,
    ) -> BoxFuture<'a, Result<Response, Rejection>>;
}

impl<W: Wrap> ErasedWrap for W {
    fn call_erased<'a>(
        &'a self,
        req: Request,
        next: &'a dyn Next,
    ) -> BoxFuture<'a, Result<Response, Rejection>> {
        Box::pin(async move {
            Wrap::call(self, req, next)
                .await
                .map_err(IntoRejection::into_rejection)
        })
    }
}

/// Compose an ordered list of middleware around a terminal handler.
///
/// The first middleware is the outermost: it sees the request first and
/// the response last.
pub fn compose<H>(wraps: Vec<BoxWrap>, handler: H) -> BoxHandler
where
    H: Handler,
{
    wraps
        .into_iter()
        .rev()
        .fold(BoxHandler::new(handler), |inner, wrap| {
            BoxHandler::new(inner.wrap(wrap))
        })
}
