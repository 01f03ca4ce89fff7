//! A small toolkit for composing HTTP services out of handlers, middleware
//! and a router.
//!
//! ```
//! use quill::wrap::{JsonBody, Trace};
//! use quill::{App, Json, Request};
//! use serde_json::json;
//!
//! async fn status(_: Request) -> Json<serde_json::Value> {
//!     Json(json!({ "ok": true }))
//! }
//!
//! # async fn run() {
//! let pipeline = App::new()
//!     .get("/status", status)
//!     .wrap(Trace)
//!     .wrap(JsonBody)
//!     .build()
//!     .unwrap();
//!
//! let response = pipeline
//!     .serve(Request::builder().uri("/status").build().unwrap())
//!     .await;
//! assert_eq!(response.status, 200);
//! # }
//! ```

mod app;
mod bounded;
mod error;
mod handler;
mod reject;
mod respond;
mod router;

pub mod extract;
pub mod http;
pub mod wrap;

pub use async_trait::async_trait;
pub use app::{App, Pipeline};
pub use bounded::{BoxError, BoxFuture};
pub use error::Error;
pub use handler::{BoxHandler, Handler, Wrapped};
pub use http::{Body, Request, Response};
pub use reject::{IntoRejection, Reject, Rejection};
pub use respond::{Json, Respond};
pub use router::Router;
pub use wrap::{compose, wrap_fn, BoxWrap, Next, Wrap};
