use crate::http::{Request, Response};
use crate::wrap::{Next, Wrap};

use std::convert::Infallible;
use std::time::Instant;

/// Logs every request with its status and latency.
///
/// Rejections from further down the chain are resolved into responses here
/// so that their status can be recorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

#[crate::async_trait]
impl Wrap for Trace {
    type Rejection = Infallible;

    async fn call(&self, req: Request, next: &dyn Next) -> Result<Response, Infallible> {
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();

        let response = match next.call(req).await {
            Ok(response) => response,
            Err(rejection) => {
                tracing::debug!(%method, %path, %rejection, "request rejected");
                rejection.reject()
            }
        };

        let status = response.status.as_u16();
        let latency_ms = started.elapsed().as_millis() as u64;
        if response.status.is_server_error() {
            tracing::error!(%method, %path, status, latency_ms, "request failed");
        } else {
            tracing::info!(%method, %path, status, latency_ms, "request handled");
        }

        Ok(response)
    }
}
