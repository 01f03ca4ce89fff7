use crate::handler::Handler;
use crate::http::{Request, Response};
use crate::reject::IntoRejection;
use crate::wrap::{Next, Wrap};
use crate::Rejection;

/// A handler wrapped with some middleware.
///
/// See [`Handler::wrap`].
pub struct Wrapped<H, W> {
    handler: H,
    wrap: W,
}

impl<H, W> Wrapped<H, W> {
    pub(crate) fn new(handler: H, wrap: W) -> Self {
        Wrapped { handler, wrap }
    }
}

#[crate::async_trait]
impl<H, W> Handler for Wrapped<H, W>
where
    H: Handler,
    W: Wrap,
{
    async fn call(&self, req: Request) -> Result<Response, Rejection> {
        let next = Inner(&self.handler);
        self.wrap
            .call(req, &next)
            .await
            .map_err(IntoRejection::into_rejection)
    }
}

/// The wrapped handler, as seen by the middleware.
struct Inner<'a, H>(&'a H);

#[crate::async_trait]
impl<'a, H> Next for Inner<'a, H>
where
    H: Handler,
{
    async fn call(&self, req: Request) -> Result<Response, Rejection> {
        self.0.call(req).await
    }
}
