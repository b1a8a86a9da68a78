// src/handlers/auth.rs

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::{HeaderMap, HeaderValue, header};
use blog_api::{
    ChangePasswordRequest, ChangeUsernameRequest, ErrorEnvelope, LoginRequest, LoginResponse,
    MessageResponse, UserResponse,
};

use crate::auth::extractors::AuthClaims;
use crate::auth::services::AuthService;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::response::AppResponse;

/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Invalid payload", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 429, description = "Account locked", body = ErrorEnvelope)
    )
)]
pub async fn login(
    State(auth_service): State<Arc<AuthService>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<AppResponse<LoginResponse>, AppError> {
    let response = auth_service.login(&payload)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok(AppResponse::ok(response).with_headers(headers))
}

/// POST /auth/logout
/// Tokens are stateless: the client drops its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    )
)]
pub async fn logout(claims: AuthClaims) -> AppResponse<MessageResponse> {
    tracing::info!(user_id = %claims.sub, "User logged out");
    AppResponse::ok(MessageResponse::new("Logged out successfully"))
}

/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    )
)]
pub async fn me(
    claims: AuthClaims,
    Extension(service): Extension<Arc<AuthService>>,
) -> Result<AppResponse<UserResponse>, AppError> {
    let user = service.current_user(claims.sub)?;
    Ok(AppResponse::ok(user))
}

/// PATCH /auth/username
#[utoipa::path(
    patch,
    path = "/auth/username",
    tag = "Auth",
    request_body = ChangeUsernameRequest,
    responses(
        (status = 200, description = "Username changed", body = UserResponse),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Wrong current password", body = ErrorEnvelope),
        (status = 409, description = "Username taken", body = ErrorEnvelope)
    )
)]
pub async fn change_username(
    claims: AuthClaims,
    Extension(service): Extension<Arc<AuthService>>,
    ValidatedJson(payload): ValidatedJson<ChangeUsernameRequest>,
) -> Result<AppResponse<UserResponse>, AppError> {
    let user = service.change_username(claims.sub, &payload)?;
    Ok(AppResponse::ok(user))
}

/// POST /auth/change-password
#[utoipa::path(
    post,
    path = "/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation failed or weak password", body = ErrorEnvelope),
        (status = 401, description = "Wrong current password", body = ErrorEnvelope)
    )
)]
pub async fn change_password(
    claims: AuthClaims,
    Extension(service): Extension<Arc<AuthService>>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<AppResponse<MessageResponse>, AppError> {
    service.change_password(claims.sub, &payload.current_password, &payload.new_password)?;
    Ok(AppResponse::ok(MessageResponse::new(
        "Password changed successfully",
    )))
}
