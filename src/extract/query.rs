use crate::http::{Request, Response, StatusCode};
use crate::Reject;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Deserialize the given type from the URL query string.
///
/// A request without a query string is treated as an empty one, so types
/// whose fields are all optional always extract.
pub fn query<T>(req: &Request) -> Result<T, QueryRejection>
where
    T: DeserializeOwned,
{
    serde_urlencoded::from_str(req.uri().query().unwrap_or_default()).map_err(QueryRejection)
}

/// The error returned by [`extract::query`](query) if extraction fails.
#[derive(Debug, Error)]
#[error("failed to deserialize query parameters: {0}")]
pub struct QueryRejection(serde_urlencoded::de::Error);

impl Reject for QueryRejection {
    fn reject(self) -> Response {
        Response::text(self.to_string()).with_status(StatusCode::BAD_REQUEST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Search {
        category: Option<String>,
        limit: Option<u32>,
    }

    #[test]
    fn optional_fields() {
        let req = Request::builder().uri("/quotes").build().unwrap();
        let search: Search = query(&req).unwrap();
        assert!(search.category.is_none());
        assert!(search.limit.is_none());
    }

    #[test]
    fn typed_fields() {
        let req = Request::builder()
            .uri("/quotes?category=inspire&limit=3")
            .build()
            .unwrap();
        let search: Search = query(&req).unwrap();
        assert_eq!(search.category.as_deref(), Some("inspire"));
        assert_eq!(search.limit, Some(3));
    }

    #[test]
    fn bad_values_are_rejected() {
        let req = Request::builder().uri("/quotes?limit=many").build().unwrap();
        let err = query::<Search>(&req).unwrap_err();
        assert_eq!(err.reject().status, StatusCode::BAD_REQUEST);
    }
}
