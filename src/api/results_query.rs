//! Read side of `/api/v1/results`: list, get, stats and options.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use super::format::Format;
use super::path::ResultPath;
use super::response::{respond, ApiResponse, ApiResult, Payload};
use crate::domain::access::visible_scope;
use crate::domain::etag::{collection_etag, none_match_hits, resource_etag};
use crate::domain::{Caller, Scope};
use crate::infrastructure::AppState;

const COLLECTION_METHODS: &str = "GET,POST,OPTIONS";
const ITEM_METHODS: &str = "GET,PUT,DELETE,OPTIONS";

fn if_none_match(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|h| h.to_str().ok())
}

#[utoipa::path(
    get,
    path = "/api/v1/results",
    tag = "results",
    responses(
        (status = 200, description = "Results visible to the caller", body = crate::api::response::ResultsEnvelope),
        (status = 304, description = "If-None-Match matched the collection ETag"),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 404, description = "No visible results", body = crate::api::error::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn list_results(
    State(state): State<AppState>,
    format: Format,
    caller: Caller,
    headers: HeaderMap,
) -> Response {
    respond(format, list(&state, &caller, &headers).await)
}

async fn list(state: &AppState, caller: &Caller, headers: &HeaderMap) -> ApiResult {
    let results = match visible_scope(caller) {
        Scope::All => state.result_repo.find_all().await?,
        Scope::Owner(user_id) => state.result_repo.find_by_owner(user_id).await?,
    };

    if results.is_empty() {
        return Err(ApiError::not_found());
    }

    let etag = collection_etag(&results);
    if none_match_hits(if_none_match(headers), &etag, false) {
        tracing::debug!("Result collection not modified for user {}", caller.id);
        return Ok(ApiResponse::not_modified(&etag));
    }

    Ok(ApiResponse::with_payload(StatusCode::OK, Payload::Results(results)).cacheable(&etag))
}

#[utoipa::path(
    get,
    path = "/api/v1/results/{id}",
    tag = "results",
    params(("id" = i32, Path, description = "Result id, optionally suffixed with .json or .xml")),
    responses(
        (status = 200, description = "The result", body = crate::api::response::ResultEnvelope),
        (status = 304, description = "If-None-Match matched the result ETag"),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody),
        (status = 403, description = "Caller is neither owner nor admin", body = crate::api::error::ErrorBody),
        (status = 404, description = "No such result", body = crate::api::error::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn get_result(
    path: ResultPath,
    State(state): State<AppState>,
    format: Format,
    caller: Caller,
    headers: HeaderMap,
) -> Response {
    respond(format, get(&state, &caller, path.id, &headers).await)
}

async fn get(state: &AppState, caller: &Caller, id: i32, headers: &HeaderMap) -> ApiResult {
    let result = state
        .result_repo
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    caller.ensure_can_access(result.user_id)?;

    let etag = resource_etag(&result);
    if none_match_hits(if_none_match(headers), &etag, true) {
        tracing::debug!("Result {} not modified", id);
        return Ok(ApiResponse::not_modified(&etag));
    }

    Ok(ApiResponse::with_payload(StatusCode::OK, Payload::Result(result)).cacheable(&etag))
}

#[utoipa::path(
    get,
    path = "/api/v1/results/stats",
    tag = "results",
    responses(
        (status = 200, description = "count/min/max/avg over the visible results", body = crate::api::response::StatsEnvelope),
        (status = 401, description = "Missing or invalid credentials", body = crate::api::error::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn result_stats(
    State(state): State<AppState>,
    format: Format,
    caller: Caller,
) -> Response {
    respond(format, stats(&state, &caller).await)
}

async fn stats(state: &AppState, caller: &Caller) -> ApiResult {
    let stats = state.result_repo.stats(visible_scope(caller)).await?;
    Ok(ApiResponse::with_payload(
        StatusCode::OK,
        Payload::Stats(stats),
    ))
}

fn allow(methods: &'static str) -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ALLOW, methods),
            (header::CACHE_CONTROL, "public, immutable"),
        ],
    )
        .into_response()
}

#[utoipa::path(
    options,
    path = "/api/v1/results",
    tag = "results",
    responses((status = 204, description = "Allowed methods in the Allow header"))
)]
pub async fn options_collection() -> Response {
    allow(COLLECTION_METHODS)
}

#[utoipa::path(
    options,
    path = "/api/v1/results/{id}",
    tag = "results",
    params(("id" = i32, Path, description = "Result id")),
    responses(
        (status = 204, description = "Allowed methods in the Allow header"),
        (status = 404, description = "Malformed id", body = crate::api::error::ErrorBody)
    )
)]
pub async fn options_item(_path: ResultPath) -> Response {
    allow(ITEM_METHODS)
}
