use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed its declared validation constraints.
///
/// Malformed JSON is rejected as `INVALID_INPUT`; constraint failures as
/// `VALIDATION_ERROR` with one entry per failed field constraint. Both happen
/// before the handler runs.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        blog_api::validation::check(&value).map_err(AppError::Validation)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use blog_api::ChangeUsernameRequest;

    fn request(body: &str) -> Request {
        Request::builder()
            .method("PATCH")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_payload() {
        let ValidatedJson(payload) = ValidatedJson::<ChangeUsernameRequest>::from_request(
            request(r#"{"currentPassword":"pw","newUsername":"writer"}"#),
            &(),
        )
        .await
        .unwrap_or_else(|_| panic!("payload should validate"));

        assert_eq!(payload.new_username, "writer");
    }

    #[tokio::test]
    async fn rejects_constraint_violations_with_field_messages() {
        let result = ValidatedJson::<ChangeUsernameRequest>::from_request(
            request(r#"{"currentPassword":"","newUsername":"ab"}"#),
            &(),
        )
        .await;

        let Err(AppError::Validation(errors)) = result else {
            panic!("expected a validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["currentPassword", "newUsername"]);
    }

    #[tokio::test]
    async fn rejects_malformed_json_as_invalid_input() {
        let result =
            ValidatedJson::<ChangeUsernameRequest>::from_request(request("{not json"), &()).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
