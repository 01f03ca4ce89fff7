mod pattern;

use pattern::Pattern;

use crate::handler::{BoxHandler, Handler};
use crate::http::{Method, Params, Request, Response, StatusCode};
use crate::{Error, Rejection};

/// Dispatches requests to the first registered route that matches.
///
/// Methods match exactly. Routes are tried in registration order, and
/// requests that match nothing go to the not-found handler, which answers
/// `404` unless replaced with [`Router::not_found`].
pub struct Router {
    routes: Vec<Route>,
    not_found: BoxHandler,
}

struct Route {
    method: Method,
    pattern: Pattern,
    handler: BoxHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::with_capacity(6),
            not_found: BoxHandler::new(not_found),
        }
    }

    /// Register a route. Fails if the path pattern is invalid.
    pub fn route<H>(
        mut self,
        method: Method,
        path: impl Into<String>,
        handler: H,
    ) -> Result<Self, Error>
    where
        H: Handler,
    {
        let pattern = Pattern::parse(path)?;
        tracing::debug!(%method, path = pattern.as_str(), "registered route");

        self.routes.push(Route {
            method,
            pattern,
            handler: BoxHandler::new(handler),
        });

        Ok(self)
    }

    /// Replace the handler for requests that match no route.
    pub fn not_found<H>(mut self, handler: H) -> Self
    where
        H: Handler,
    {
        self.not_found = BoxHandler::new(handler);
        self
    }

    fn find(&self, method: &Method, path: &str) -> Option<(&Route, Params)> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[crate::async_trait]
impl Handler for Router {
    async fn call(&self, req: Request) -> Result<Response, Rejection> {
        match self.find(req.method(), req.path()) {
            Some((route, params)) => route.handler.call(req.with_path_params(params)).await,
            None => self.not_found.call(req).await,
        }
    }
}

async fn not_found(_: Request) -> StatusCode {
    StatusCode::NOT_FOUND
}
