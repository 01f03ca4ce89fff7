use bytes::Bytes;
use serde_json::Value;

/// The body of a [`Response`](super::Response).
///
/// A body is either already encoded (`Bytes`, `Text`) or a structured value
/// waiting to be serialized (`Json`). Structured bodies are encoded by the
/// [`JsonBody`](crate::wrap::JsonBody) middleware, or by the transport as a
/// last resort.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Bytes),
    Text(String),
    Json(Value),
}

impl Body {
    /// Whether this body is a structured value pending serialization.
    pub fn is_structured(&self) -> bool {
        matches!(self, Body::Json(_))
    }

    /// The encoded bytes of this body, if it has been encoded.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Empty => Some(&[]),
            Body::Bytes(bytes) => Some(bytes),
            Body::Text(text) => Some(text.as_bytes()),
            Body::Json(_) => None,
        }
    }

    /// Convert the body into raw bytes, serializing structured values.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Body::Empty => Bytes::new(),
            Body::Bytes(bytes) => bytes,
            Body::Text(text) => Bytes::from(text),
            Body::Json(value) => Bytes::from(value.to_string()),
        }
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Body::Text(text.to_owned())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes.into())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}
