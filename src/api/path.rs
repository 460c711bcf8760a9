use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use super::error::ApiError;
use super::format::{split_suffix, Format};

/// `{id}` or `{id}.{format}` path segment of an item route.
/// Anything but a non-negative integer id is a 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultPath {
    pub id: i32,
}

impl ResultPath {
    pub fn parse(segment: &str) -> Option<Self> {
        let (stem, _) = split_suffix(segment);
        if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem.parse().ok().map(|id| ResultPath { id })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResultPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let format = Format::from_parts(parts);
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found().with_format(format))?;

        ResultPath::parse(&segment).ok_or_else(|| ApiError::not_found().with_format(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_suffixed_ids() {
        assert_eq!(ResultPath::parse("12"), Some(ResultPath { id: 12 }));
        assert_eq!(ResultPath::parse("12.xml"), Some(ResultPath { id: 12 }));
        assert_eq!(ResultPath::parse("0.json"), Some(ResultPath { id: 0 }));
    }

    #[test]
    fn rejects_non_numeric_segments() {
        assert_eq!(ResultPath::parse("abc"), None);
        assert_eq!(ResultPath::parse("-1"), None);
        assert_eq!(ResultPath::parse("1.yaml"), None);
        assert_eq!(ResultPath::parse(".json"), None);
        assert_eq!(ResultPath::parse("99999999999"), None);
    }
}
