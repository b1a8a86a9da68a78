use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::auth::jwt::{Claims, JwtManager};
use crate::error::AppError;

/// Authenticated caller of a protected route.
/// Validates `Authorization: Bearer <JWT>` through the router's `JwtManager` state.
#[derive(Debug, Clone)]
pub struct AuthClaims {
    pub sub: uuid::Uuid,
    pub username: String,
}

impl From<Claims> for AuthClaims {
    fn from(c: Claims) -> Self {
        Self {
            sub: c.sub,
            username: c.username,
        }
    }
}

impl FromRequestParts<JwtManager> for AuthClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        jwt_manager: &JwtManager,
    ) -> Result<Self, Self::Rejection> {
        const BEARER: &str = "Bearer ";

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER))
            .filter(|token| !token.is_empty())
            .ok_or(AppError::InvalidTokenFormat)?;

        let claims = jwt_manager.verify_token(token).map_err(|e| {
            tracing::debug!("Rejected bearer token: {e}");
            AppError::from(e)
        })?;

        Ok(AuthClaims::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(jwt: &JwtManager, authorization: Option<&str>) -> Result<AuthClaims, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        AuthClaims::from_request_parts(&mut parts, jwt).await
    }

    #[tokio::test]
    async fn missing_header_is_invalid_format() {
        let jwt = JwtManager::new("extractor_secret", 1);
        let err = extract(&jwt, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTokenFormat));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_invalid_format() {
        let jwt = JwtManager::new("extractor_secret", 1);
        let err = extract(&jwt, Some("Basic dXNlcjpwYXNz")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTokenFormat));
    }

    #[tokio::test]
    async fn bad_signature_is_unauthorized() {
        let jwt = JwtManager::new("extractor_secret", 1);
        let err = extract(&jwt, Some("Bearer a.b.c")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let jwt = JwtManager::new("extractor_secret", 1);
        let user_id = uuid::Uuid::new_v4();
        let token = jwt.generate_access_token(user_id, "owner").unwrap();

        let claims = extract(&jwt, Some(&format!("Bearer {token}"))).await.unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "owner");
    }
}
