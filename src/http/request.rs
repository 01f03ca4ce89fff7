use super::{header, Bytes, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use crate::Error;

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::{json, Value};

/// An HTTP request.
///
/// Requests are immutable once built. Middleware that needs to change a
/// request passes a modified copy on to the next handler with
/// [`with_header`](Request::with_header) or [`with_param`](Request::with_param).
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    query: HashMap<String, String>,
    path_params: Params,
    params: OnceCell<HashMap<String, String>>,
}

impl Request {
    /// Start building a request. Defaults to `GET /` with no headers or body.
    pub fn builder() -> RequestBuilder {
        RequestBuilder {
            method: Method::GET,
            uri: "/".to_owned(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Convert a buffered request from the `http` crate.
    pub fn from_http(req: http::Request<Bytes>) -> Result<Self, Error> {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts.method, parts.uri, parts.headers, body)
    }

    fn from_parts(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Self, Error> {
        let query = match uri.query() {
            Some(query) => serde_urlencoded::from_str::<Vec<(String, String)>>(query)?
                .into_iter()
                .collect(),
            None => HashMap::new(),
        };

        Ok(Request {
            method,
            uri,
            headers,
            body,
            query,
            path_params: Params::default(),
            params: OnceCell::new(),
        })
    }

    /// The request's method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request's URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The path component of the URI.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The request's headers. Header names are case-insensitive.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The value of a header, if present and valid UTF-8.
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// The parsed `content-type` header.
    pub fn content_type(&self) -> Option<mime::Mime> {
        self.header(header::CONTENT_TYPE)?.parse().ok()
    }

    /// The raw request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The decoded query string.
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Parameters captured by the matched route.
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Query parameters merged with url-encoded form parameters.
    ///
    /// Form parameters take precedence over query parameters of the same
    /// name. The map is computed on first access.
    pub fn params(&self) -> &HashMap<String, String> {
        self.params.get_or_init(|| {
            let mut params = self.query.clone();
            if self.is_form() {
                match serde_urlencoded::from_bytes::<Vec<(String, String)>>(&self.body) {
                    Ok(form) => params.extend(form),
                    Err(err) => tracing::debug!(error = %err, "ignoring undecodable form body"),
                }
            }
            params
        })
    }

    /// A single entry of [`params`](Request::params).
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params().get(name).map(String::as_str)
    }

    /// Return this request with a header replaced.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Return this request with a parameter replaced.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params();
        if let Some(params) = self.params.get_mut() {
            params.insert(name.into(), value.into());
        }
        self
    }

    pub(crate) fn with_path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// A JSON description of the whole request, for debugging.
    pub fn describe(&self) -> Value {
        let headers: HashMap<&str, String> = self
            .headers
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.as_str(), value)
            })
            .collect();

        json!({
            "method": self.method.as_str(),
            "uri": self.uri.to_string(),
            "path": self.path(),
            "query": self.query,
            "params": self.params(),
            "path_params": self.path_params.iter().collect::<HashMap<_, _>>(),
            "headers": headers,
            "body": String::from_utf8_lossy(&self.body),
        })
    }

    fn is_form(&self) -> bool {
        self.content_type()
            .map(|mime| mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
            .unwrap_or(false)
    }
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<Error>,
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Append a header. Invalid names or values fail the final `build`.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => {
                self.error
                    .get_or_insert(Error::InvalidHeader(format!("{name}: {value}")));
            }
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a url-encoded form body and its content type.
    pub fn form<T: Serialize + ?Sized>(mut self, form: &T) -> Self {
        match serde_urlencoded::to_string(form) {
            Ok(encoded) => {
                self.body = encoded.into();
                self.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
            }
            Err(err) => {
                self.error.get_or_insert(Error::Form(err));
            }
        }
        self
    }

    /// Set a JSON body and its content type.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(encoded) => {
                self.body = encoded.into();
                self.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
            }
            Err(err) => {
                self.error.get_or_insert(Error::Serialize(err));
            }
        }
        self
    }

    pub fn build(self) -> Result<Request, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let uri = self.uri.parse::<Uri>().map_err(|source| Error::InvalidUri {
            uri: self.uri.clone(),
            source,
        })?;

        Request::from_parts(self.method, uri, self.headers, self.body)
    }
}

/// Parameters captured from a route pattern.
///
/// Named segments (`/users/:id`) are stored under their name and a trailing
/// wildcard (`/files/*`) under `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub(crate) fn new(params: Vec<(String, String)>) -> Self {
        Params(params)
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The suffix matched by a trailing wildcard.
    pub fn wildcard(&self) -> Option<&str> {
        self.get("*")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}
