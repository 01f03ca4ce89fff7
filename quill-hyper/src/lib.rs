//! Serve a [`quill::Pipeline`] over HTTP/1 with hyper.
//!
//! Every connection runs on its own task. Request bodies are buffered up to
//! a configurable limit before the pipeline sees them, and a connection that
//! outlives its timeout is dropped along with any in-flight handler.

use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use quill::http::{header, HeaderValue, StatusCode};
use quill::wrap::encode_json;
use quill::{Pipeline, Request, Response};
use tokio::net::{TcpListener, TcpStream};

/// Default maximum request body size (~256kb).
pub const DEFAULT_BODY_LIMIT: usize = 256 * 1024;

/// Default lifetime of a single connection.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// An HTTP server for a composed pipeline.
pub struct Server {
    pipeline: Arc<Pipeline>,
    body_limit: usize,
    connection_timeout: Duration,
}

impl Server {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            body_limit: DEFAULT_BODY_LIMIT,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    /// Set the maximum number of body bytes buffered per request.
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Set how long a connection may stay open.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Accept connections until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = %listener.local_addr()?, "listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(stream, peer),
                    Err(err) => accept_failed(&err).await,
                },
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let io = TokioIo::new(stream);
        let pipeline = Arc::clone(&self.pipeline);
        let body_limit = self.body_limit;
        let timeout = self.connection_timeout;

        tokio::spawn(async move {
            let service = service_fn(move |req| handle(Arc::clone(&pipeline), body_limit, req));
            let conn = http1::Builder::new()
                .keep_alive(true)
                .serve_connection(io, service);

            match tokio::time::timeout(timeout, conn).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::debug!(%peer, error = %err, "connection error"),
                Err(_) => tracing::debug!(%peer, "connection timed out"),
            }
        });
    }
}

// Errors like EMFILE persist until connections close, so retrying at once
// would spin.
async fn accept_failed(err: &io::Error) {
    tracing::warn!(error = %err, "failed to accept connection");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

async fn handle(
    pipeline: Arc<Pipeline>,
    body_limit: usize,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match Limited::new(body, body_limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            return Ok(into_hyper(Response::new(StatusCode::PAYLOAD_TOO_LARGE)));
        }
        Err(err) => {
            tracing::debug!(error = %err, "failed to read request body");
            return Ok(into_hyper(Response::new(StatusCode::BAD_REQUEST)));
        }
    };

    let request = match Request::from_http(http::Request::from_parts(parts, body)) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(error = %err, "malformed request");
            return Ok(into_hyper(
                Response::text(err.to_string()).with_status(StatusCode::BAD_REQUEST),
            ));
        }
    };

    Ok(into_hyper(pipeline.serve(request).await))
}

fn into_hyper(response: Response) -> hyper::Response<Full<Bytes>> {
    let Response {
        status,
        mut headers,
        body,
    } = encode_json(response);

    let bytes = body.into_bytes();
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));

    let mut out = hyper::Response::new(Full::new(bytes));
    *out.status_mut() = status;
    *out.headers_mut() = headers;
    out
}
