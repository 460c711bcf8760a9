//! Write side of `/api/v1/results`: create, update and delete.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Response,
};

use super::error::ApiError;
use super::format::Format;
use super::path::ResultPath;
use super::payload::value_field;
use super::response::{content_returned, respond, ApiResponse, ApiResult, Payload};
use super::RESULTS_PATH;
use crate::domain::etag::{if_match_holds, resource_etag};
use crate::domain::Caller;
use crate::infrastructure::AppState;

/// Absolute URL of a result when the request named its host, else the path.
fn location(headers: &HeaderMap, id: i32) -> String {
    let path = format!("{RESULTS_PATH}/{id}");
    let host = headers.get(header::HOST).and_then(|h| h.to_str().ok());

    match host {
        Some(host) => {
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("http");
            format!("{scheme}://{host}{path}")
        }
        None => path,
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/results",
    tag = "results",
    request_body = crate::api::payload::ValueRequest,
    responses(
        (status = 201, description = "Result created, Location points at it", body = crate::api::response::ResultEnvelope),
        (status = 400, description = "Malformed body", body = crate::api::error::ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 422, description = "Missing or non-integer value", body = crate::api::error::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn create_result(
    State(state): State<AppState>,
    format: Format,
    caller: Caller,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    respond(format, create(&state, &caller, &headers, &body).await)
}

async fn create(state: &AppState, caller: &Caller, headers: &HeaderMap, body: &[u8]) -> ApiResult {
    let value = value_field(headers, body)?.require()?;

    let owner = state
        .user_repo
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token subject {} no longer exists", caller.email);
            ApiError::unauthorized()
        })?;

    let result = state.result_repo.create(owner.id, value).await?;
    tracing::info!("Result {} created by user {}", result.id, owner.id);

    let location = location(headers, result.id);
    Ok(
        ApiResponse::with_payload(StatusCode::CREATED, Payload::Result(result))
            .with_header(header::LOCATION, &location),
    )
}

#[utoipa::path(
    put,
    path = "/api/v1/results/{id}",
    tag = "results",
    params(
        ("id" = i32, Path, description = "Result id, optionally suffixed with .json or .xml"),
        ("If-Match" = String, Header, description = "Current ETag of the result")
    ),
    request_body = crate::api::payload::ValueRequest,
    responses(
        (status = 209, description = "Result updated, new representation returned", body = crate::api::response::ResultEnvelope),
        (status = 400, description = "Malformed body", body = crate::api::error::ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller is neither owner nor admin", body = crate::api::error::ErrorBody),
        (status = 404, description = "No such result", body = crate::api::error::ErrorBody),
        (status = 412, description = "If-Match missing or stale", body = crate::api::error::ErrorBody),
        (status = 422, description = "Missing or non-integer value", body = crate::api::error::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn update_result(
    path: ResultPath,
    State(state): State<AppState>,
    format: Format,
    caller: Caller,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    respond(format, update(&state, &caller, path.id, &headers, &body).await)
}

async fn update(
    state: &AppState,
    caller: &Caller,
    id: i32,
    headers: &HeaderMap,
    body: &[u8],
) -> ApiResult {
    let current = state
        .result_repo
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    caller.ensure_can_access(current.user_id)?;

    let if_match = headers.get(header::IF_MATCH).and_then(|h| h.to_str().ok());
    if !if_match_holds(if_match, &resource_etag(&current)) {
        tracing::warn!("Stale or missing If-Match on result {}", id);
        return Err(ApiError::precondition_failed());
    }

    let value = value_field(headers, body)?.require()?;

    let updated = state.result_repo.update_value(id, value).await?;
    tracing::info!("Result {} updated by user {}", id, caller.id);

    let etag = resource_etag(&updated);
    Ok(
        ApiResponse::with_payload(content_returned(), Payload::Result(updated))
            .with_header(header::ETAG, &etag),
    )
}

#[utoipa::path(
    delete,
    path = "/api/v1/results/{id}",
    tag = "results",
    params(("id" = i32, Path, description = "Result id, optionally suffixed with .json or .xml")),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller is neither owner nor admin", body = crate::api::error::ErrorBody),
        (status = 404, description = "No such result", body = crate::api::error::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn delete_result(
    path: ResultPath,
    State(state): State<AppState>,
    format: Format,
    caller: Caller,
) -> Response {
    respond(format, delete(&state, &caller, path.id).await)
}

async fn delete(state: &AppState, caller: &Caller, id: i32) -> ApiResult {
    let result = state
        .result_repo
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    caller.ensure_can_access(result.user_id)?;

    state.result_repo.delete(id).await?;
    tracing::info!("Result {} deleted by user {}", id, caller.id);

    Ok(ApiResponse::new(StatusCode::NO_CONTENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn location_uses_host_and_forwarded_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(location(&headers, 3), "/api/v1/results/3");

        headers.insert(header::HOST, HeaderValue::from_static("api.test:8000"));
        assert_eq!(location(&headers, 3), "http://api.test:8000/api/v1/results/3");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(location(&headers, 3), "https://api.test:8000/api/v1/results/3");
    }
}
