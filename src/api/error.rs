//! API error type and its HTTP rendering.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use super::format::Format;
use crate::domain::DomainError;

/// Error body: `{"code": 404, "message": "Not Found"}`
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename = "error")]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    format: Format,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            format: Format::default(),
        }
    }

    /// Error whose message is the canonical reason phrase of `status`.
    fn with_reason(status: StatusCode) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("Error"))
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED: Invalid credentials.")
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "FORBIDDEN: you don't have permission to access",
        )
    }

    pub fn not_found() -> Self {
        Self::with_reason(StatusCode::NOT_FOUND)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn precondition_failed() -> Self {
        Self::new(StatusCode::PRECONDITION_FAILED, "PRECONDITION FAILED")
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal() -> Self {
        Self::with_reason(StatusCode::INTERNAL_SERVER_ERROR)
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.status.as_u16(),
            message: self.message.clone(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ApiError::not_found(),
            DomainError::Forbidden => ApiError::forbidden(),
            DomainError::Validation(msg) => ApiError::unprocessable_entity(msg),
            DomainError::Database(_) | DomainError::Internal(_) => {
                tracing::error!("Request failed: {}", e);
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        let rendered = match self.format {
            Format::Json => serde_json::to_string(&body).map_err(|e| e.to_string()),
            Format::Xml => quick_xml::se::to_string_with_root("error", &body)
                .map_err(|e| e.to_string()),
        };

        match rendered {
            Ok(text) => (
                self.status,
                [(header::CONTENT_TYPE, self.format.content_type())],
                text,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Failed to render error body: {}", e);
                (self.status, self.message).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(DomainError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DomainError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(DomainError::Validation("bad".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(DomainError::Database("locked".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_details_are_not_leaked() {
        let error = ApiError::from(DomainError::Database("no such table".into()));
        assert_eq!(error.message(), "Internal Server Error");
    }

    #[test]
    fn xml_error_body() {
        let body = ApiError::not_found().body();
        let xml = quick_xml::se::to_string_with_root("error", &body).unwrap();
        assert_eq!(
            xml,
            "<error><code>404</code><message>Not Found</message></error>"
        );
    }
}
