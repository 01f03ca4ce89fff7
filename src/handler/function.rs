use crate::handler::Handler;
use crate::http::{Request, Response};
use crate::reject::IntoRejection;
use crate::{Rejection, Respond};

use std::future::Future;

#[crate::async_trait]
impl<F, O, R> Handler for F
where
    F: Fn(Request) -> O + Send + Sync + 'static,
    O: Future<Output = R> + Send + 'static,
    R: Respond + Send + 'static,
{
    async fn call(&self, req: Request) -> Result<Response, Rejection> {
        self(req)
            .await
            .respond()
            .map_err(IntoRejection::into_rejection)
    }
}
