use crate::handler::{BoxHandler, Handler};
use crate::http::{Method, Request, Response};
use crate::router::Router;
use crate::wrap::{compose, BoxWrap, Wrap};
use crate::Error;

/// Builder for a [`Pipeline`]: a router wrapped in middleware.
///
/// ```
/// use quill::wrap::{JsonBody, Trace};
/// use quill::{App, Request};
///
/// async fn hello(_: Request) -> &'static str {
///     "Hello!"
/// }
///
/// let pipeline = App::new()
///     .get("/", hello)
///     .wrap(Trace)
///     .wrap(JsonBody)
///     .build()
///     .unwrap();
/// ```
pub struct App {
    router: Router,
    wraps: Vec<BoxWrap>,
    error: Option<Error>,
}

impl App {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            wraps: Vec::new(),
            error: None,
        }
    }

    /// Add middleware around every route.
    ///
    /// Middleware runs in the order it was added: the first one sees the
    /// request first and the response last.
    pub fn wrap<W>(mut self, wrap: W) -> Self
    where
        W: Wrap,
    {
        self.wraps.push(BoxWrap::new(wrap));
        self
    }

    /// Register a route.
    ///
    /// An invalid path pattern is reported by [`App::build`].
    pub fn route<H>(self, method: Method, path: impl Into<String>, handler: H) -> Self
    where
        H: Handler,
    {
        if self.error.is_some() {
            return self;
        }

        match self.router.route(method, path, handler) {
            Ok(router) => Self {
                router,
                wraps: self.wraps,
                error: None,
            },
            Err(err) => Self {
                router: Router::new(),
                wraps: self.wraps,
                error: Some(err),
            },
        }
    }

    /// Replace the handler for requests that match no route.
    pub fn not_found<H>(mut self, handler: H) -> Self
    where
        H: Handler,
    {
        self.router = self.router.not_found(handler);
        self
    }

    /// Compose the middleware and router into a single pipeline.
    pub fn build(self) -> Result<Pipeline, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }

        Ok(Pipeline {
            handler: compose(self.wraps, self.router),
        })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! insert_route {
    ($name:ident => Method::$method:ident) => {
        #[doc = concat!("Insert a route for the `", stringify!($method), "` method.")]
        pub fn $name<H>(self, path: impl Into<String>, handler: H) -> Self
        where
            H: Handler,
        {
            self.route(Method::$method, path, handler)
        }
    };
}

impl App {
    insert_route!(get => Method::GET);
    insert_route!(put => Method::PUT);
    insert_route!(post => Method::POST);
    insert_route!(delete => Method::DELETE);
    insert_route!(head => Method::HEAD);
    insert_route!(options => Method::OPTIONS);
    insert_route!(patch => Method::PATCH);
}

/// A composed handler that always produces a response.
pub struct Pipeline {
    handler: BoxHandler,
}

impl Pipeline {
    /// Serve a single request.
    ///
    /// Rejections that escape every middleware are converted into
    /// responses here, so this never fails.
    pub async fn serve(&self, req: Request) -> Response {
        match self.handler.call(req).await {
            Ok(response) => response,
            Err(rejection) => {
                tracing::debug!(%rejection, "unhandled rejection");
                rejection.reject()
            }
        }
    }
}
