use crate::bounded::BoxFuture;
use crate::http::{Request, Response};
use crate::wrap::{Next, Wrap};
use crate::Rejection;

/// Create middleware from a closure.
///
/// ```
/// use quill::wrap::wrap_fn;
///
/// let passthrough = wrap_fn(|req, next| Box::pin(async move { next.call(req).await }));
/// ```
pub fn wrap_fn<F>(f: F) -> WrapFn<F>
where
    F: for<'a> Fn(Request, &'a dyn Next) -> BoxFuture<'a, Result<Response, Rejection>>
        + Send
        + Sync
        + 'static,
{
    WrapFn(f)
}

/// Middleware created with [`wrap_fn`].
pub struct WrapFn<F>(F);

#[crate::async_trait]
impl<F> Wrap for WrapFn<F>
where
    F: for<'a> Fn(Request, &'a dyn Next) -> BoxFuture<'a, Result<Response, Rejection>>
        + Send
        + Sync
        + 'static,
{
    type Rejection = Rejection;

    async fn call(&self, req: Request, next: &dyn Next) -> Result<Response, Rejection> {
        (self.0)(req, next).await
    }
}
