// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blog_api::{ErrorEnvelope, FieldError};

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    // === Repository errors ===
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Duplicate(String),
    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Authentication errors ===
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Current password is incorrect")]
    InvalidPassword,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Password too weak: {0}")]
    WeakPassword(String),
    #[error("Invalid token format")]
    InvalidTokenFormat,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Too many attempts: {0}")]
    TooManyAttempts(String),

    // === Hashing / crypto errors ===
    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
    #[error("Token generation failed: {0}")]
    TokenGenerationFailed(String),

    // === Validation errors ===
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Handler-chosen status and code.
    #[error("{message}")]
    Custom {
        status: StatusCode,
        code: &'static str,
        message: String,
    },

    // === Internal errors ===
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope, internal_detail) = self.envelope();

        if let Some(ref detail) = internal_detail {
            tracing::error!(code = %envelope.code, %status, detail, "Internal server error");
        } else {
            tracing::debug!(code = %envelope.code, %status, message = %envelope.message, "Request failed");
        }

        (status, Json(envelope)).into_response()
    }
}

impl AppError {
    /// Status, public envelope, and the detail that must only reach the logs.
    fn envelope(self) -> (StatusCode, ErrorEnvelope, Option<String>) {
        let (status, code, message, detail) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Duplicate(msg) => (StatusCode::CONFLICT, "DUPLICATE_ENTRY", msg, None),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                "Username already taken".to_string(),
                None,
            ),

            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
                None,
            ),
            AppError::InvalidPassword => (
                StatusCode::UNAUTHORIZED,
                "INVALID_PASSWORD",
                "Current password is incorrect".to_string(),
                None,
            ),
            AppError::InvalidTokenFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN_FORMAT",
                "Missing or malformed bearer token".to_string(),
                None,
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),

            AppError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, "WEAK_PASSWORD", msg, None),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg, None),
            AppError::Validation(errors) => {
                let message = errors
                    .first()
                    .map_or_else(|| "Validation failed".to_string(), |e| e.message.clone());
                let envelope =
                    ErrorEnvelope::new("VALIDATION_ERROR", message).with_errors(errors);
                return (StatusCode::BAD_REQUEST, envelope, None);
            }

            AppError::TooManyAttempts(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_ATTEMPTS", msg, None)
            }

            AppError::Custom {
                status,
                code,
                message,
            } => (status, code, message, None),

            AppError::PasswordHashingFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "HASHING_ERROR",
                "An error occurred while processing your request".to_string(),
                Some(msg),
            ),
            AppError::TokenGenerationFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_ERROR",
                "An error occurred while generating token".to_string(),
                Some(msg),
            ),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An error occurred with the database".to_string(),
                Some(msg),
            ),
            AppError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                Some(msg),
            ),
        };

        (status, ErrorEnvelope::new(code, message), detail)
    }

    // === Helper constructors ===
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        AppError::Duplicate(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        AppError::DatabaseError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::InternalServerError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn hashing_failed(msg: impl Into<String>) -> Self {
        AppError::PasswordHashingFailed(msg.into())
    }

    pub fn token_generation_failed(msg: impl Into<String>) -> Self {
        AppError::TokenGenerationFailed(msg.into())
    }

    /// Error with an explicit status and machine-readable code.
    pub fn custom(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        AppError::Custom {
            status,
            code,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn status_code(&self) -> StatusCode {
        self.clone().envelope().0
    }
}

// === Conversions from lower layers ===

impl From<crate::db::error::RepositoryError> for AppError {
    fn from(err: crate::db::error::RepositoryError) -> Self {
        use crate::db::error::RepositoryError;

        match err {
            RepositoryError::NotFound(msg) => AppError::not_found(msg),
            RepositoryError::UniqueViolation(msg) => AppError::duplicate(msg),
            RepositoryError::Pool(msg)
            | RepositoryError::ForeignKeyViolation(msg)
            | RepositoryError::Database(msg) => AppError::database(msg),
        }
    }
}

impl From<crate::auth::jwt::JwtError> for AppError {
    fn from(err: crate::auth::jwt::JwtError) -> Self {
        match err {
            crate::auth::jwt::JwtError::GenerationFailed(e) => {
                AppError::token_generation_failed(e.to_string())
            }
            crate::auth::jwt::JwtError::VerificationFailed(_) => {
                AppError::unauthorized("Invalid or expired token")
            }
        }
    }
}

impl From<crate::auth::password::PasswordError> for AppError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        AppError::hashing_failed(err.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::invalid_input(err.body_text())
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(err: axum::extract::rejection::PathRejection) -> Self {
        AppError::invalid_input(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn not_found_displays_correct_message() {
        let err = AppError::not_found("Post");
        assert_eq!(err.to_string(), "Not found: Post");
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidPassword.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::UsernameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::TooManyAttempts("locked".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn custom_error_renders_envelope() {
        let err = AppError::custom(StatusCode::FORBIDDEN, "READ_ONLY", "Blog is read-only");
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "code": "READ_ONLY",
                "message": "Blog is read-only"
            })
        );
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let err = AppError::Validation(vec![FieldError::new(
            "newUsername",
            "newUsername must be at least 3 characters",
        )]);
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "newUsername must be at least 3 characters");
        assert_eq!(body["errors"][0]["field"], "newUsername");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let (status, body) = body_json(AppError::database("connection refused")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("refused"));
    }

    #[test]
    fn repository_unique_violation_becomes_duplicate() {
        let err = AppError::from(crate::db::error::RepositoryError::UniqueViolation(
            "posts_slug_key".to_string(),
        ));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
