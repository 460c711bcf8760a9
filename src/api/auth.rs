use crate::api::error::ApiError;
use crate::auth::verify_password;
use crate::infrastructure::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    token: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/login_check",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::error::ErrorBody)
    )
)]
pub async fn login_check(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for user: {}", payload.email);

    let user = match state.user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            tracing::warn!("User not found: {}", payload.email);
            return ApiError::unauthorized().into_response();
        }
        Err(e) => {
            tracing::error!("User lookup failed: {}", e);
            return ApiError::internal().into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => match state.jwt.create_jwt(&user) {
            Ok(token) => {
                tracing::info!("Token issued for user: {}", user.email);
                (StatusCode::OK, Json(LoginResponse { token })).into_response()
            }
            Err(e) => {
                tracing::error!("Failed to sign token: {}", e);
                ApiError::internal().into_response()
            }
        },
        _ => {
            tracing::warn!("Password verification failed for user: {}", user.email);
            ApiError::unauthorized().into_response()
        }
    }
}
