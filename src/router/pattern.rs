use crate::http::Params;
use crate::Error;

/// A compiled route path.
///
/// Supports literal segments, `:name` segments that capture a single
/// non-empty segment, and a trailing `/*` that captures any suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pattern {
    raw: String,
    segments: Vec<Segment>,
    wildcard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Pattern {
    pub(crate) fn parse(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let invalid = |reason| Error::InvalidPattern {
            pattern: raw.clone(),
            reason,
        };

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut parts: Vec<&str> = rest.split('/').collect();
        let wildcard = parts.last() == Some(&"*");
        if wildcard {
            parts.pop();
        }

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            if part.contains('*') {
                return Err(invalid("'*' is only allowed as the final segment"));
            }

            match part.strip_prefix(':') {
                Some("") => return Err(invalid("parameter segments need a name")),
                Some(name) => segments.push(Segment::Param(name.to_owned())),
                None => segments.push(Segment::Literal(part.to_owned())),
            }
        }

        Ok(Pattern {
            raw,
            segments,
            wildcard,
        })
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning the captured parameters.
    pub(crate) fn matches(&self, path: &str) -> Option<Params> {
        let rest = path.strip_prefix('/')?;

        let parts: Vec<&str> = if self.wildcard {
            rest.splitn(self.segments.len() + 1, '/').collect()
        } else {
            rest.split('/').collect()
        };

        let expected = self.segments.len() + usize::from(self.wildcard);
        if parts.len() != expected {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.push((name.clone(), (*part).to_owned()));
                }
                _ => return None,
            }
        }

        if self.wildcard {
            params.push(("*".to_owned(), parts[self.segments.len()].to_owned()));
        }

        Some(Params::new(params))
    }
}
