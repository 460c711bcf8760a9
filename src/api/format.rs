//! Response format negotiation.
//!
//! A `.json` / `.xml` suffix on the last path segment wins; otherwise the
//! first recognised media type in `Accept` decides; JSON is the default.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Xml => "application/xml",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    fn from_media_type(media: &str) -> Option<Self> {
        let essence = media.split(';').next().unwrap_or_default().trim();
        match essence {
            "application/json" | "application/*" | "*/*" => Some(Format::Json),
            "application/xml" | "text/xml" => Some(Format::Xml),
            _ => None,
        }
    }

    pub fn negotiate(path: &str, accept: Option<&str>) -> Self {
        if let (_, Some(format)) = split_suffix(last_segment(path)) {
            return format;
        }

        accept
            .and_then(|accept| accept.split(',').find_map(Format::from_media_type))
            .unwrap_or_default()
    }

    pub fn from_parts(parts: &Parts) -> Self {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|h| h.to_str().ok());
        Format::negotiate(parts.uri.path(), accept)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Splits `"5.xml"` into `("5", Some(Xml))`. Unknown extensions are left in place.
pub fn split_suffix(segment: &str) -> (&str, Option<Format>) {
    match segment.rsplit_once('.') {
        Some((stem, ext)) => match Format::from_extension(ext) {
            Some(format) => (stem, Some(format)),
            None => (segment, None),
        },
        None => (segment, None),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Format::from_parts(parts))
    }
}
