//! Asynchronous functions that can handle HTTP requests.

mod erased;
mod function;
mod wrapped;

pub use erased::BoxHandler;
pub use wrapped::Wrapped;

use crate::http::{Request, Response};
use crate::{Rejection, Wrap};

/// An asynchronous HTTP handler.
///
/// You should not need to implement this trait directly, it is
/// automatically implemented for async functions taking a [`Request`]
/// and returning a [`Respond`](crate::Respond) type.
#[crate::async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Call the handler with a request.
    async fn call(&self, req: Request) -> Result<Response, Rejection>;

    /// Wrap a handler with some middleware.
    fn wrap<W>(self, wrap: W) -> Wrapped<Self, W>
    where
        W: Wrap,
        Self: Sized,
    {
        Wrapped::new(self, wrap)
    }
}
