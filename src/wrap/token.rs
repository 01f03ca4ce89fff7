use crate::http::{Request, Response, StatusCode};
use crate::wrap::{Next, Wrap};
use crate::Rejection;

use secrecy::{ExposeSecret, SecretString};

/// Rejects requests that do not carry a shared secret.
///
/// The secret is read from [`Request::params`], so it may arrive in the
/// query string or in a url-encoded form body. Requests with a missing or
/// wrong token get a `400 Invalid token` response and never reach the
/// wrapped handler.
pub struct TokenCheck {
    field: String,
    secret: SecretString,
}

impl TokenCheck {
    /// Check the `token` parameter against `secret`.
    pub fn new(secret: SecretString) -> Self {
        TokenCheck {
            field: "token".to_owned(),
            secret,
        }
    }

    /// Read the token from a different parameter.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    fn verify(&self, req: &Request) -> bool {
        req.param(&self.field)
            .map(|token| token == self.secret.expose_secret())
            .unwrap_or(false)
    }
}

#[crate::async_trait]
impl Wrap for TokenCheck {
    type Rejection = Rejection;

    async fn call(&self, req: Request, next: &dyn Next) -> Result<Response, Rejection> {
        if !self.verify(&req) {
            tracing::warn!(
                path = req.path(),
                field = %self.field,
                "rejected request with invalid token"
            );
            return Ok(Response::text("Invalid token").with_status(StatusCode::BAD_REQUEST));
        }

        next.call(req).await
    }
}
