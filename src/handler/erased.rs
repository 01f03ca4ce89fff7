use crate::handler::Handler;
use crate::http::{Request, Response};
use crate::Rejection;

/// A type-erased [`Handler`].
pub struct BoxHandler(Box<dyn Handler>);

impl BoxHandler {
    pub fn new<H>(handler: H) -> Self
    where
        H: Handler,
    {
        BoxHandler(Box::new(handler))
    }
}

#[crate::async_trait]
impl Handler for BoxHandler {
    async fn call(&self, req: Request) -> Result<Response, Rejection> {
        self.0.call(req).await
    }
}
