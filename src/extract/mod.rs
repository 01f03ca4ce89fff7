//! Typed access to request bodies and query strings.
//!
//! Each extractor returns a rejection that answers the request with a
//! client error, so handlers can use `?` directly.

mod form;
mod json;
mod query;

pub use form::{form, FormRejection};
pub use json::{json, JsonRejection};
pub use query::{query, QueryRejection};
