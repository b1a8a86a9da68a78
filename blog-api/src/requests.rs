use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;

// -------- AUTH --------
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username should not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String, // Plain text
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUsernameRequest {
    #[validate(length(min = 1, message = "currentPassword should not be empty"))]
    pub current_password: String,
    #[validate(
        length(min = 1, message = "newUsername should not be empty"),
        custom(function = "validate_username_bounds")
    )]
    pub new_username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "currentPassword should not be empty"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "newPassword must be at least 8 characters"))]
    pub new_password: String,
}

fn validate_username_bounds(username: &str) -> Result<(), ValidationError> {
    let chars = username.chars().count();
    let message = if chars < USERNAME_MIN_CHARS {
        format!("newUsername must be at least {USERNAME_MIN_CHARS} characters")
    } else if chars > USERNAME_MAX_CHARS {
        format!("newUsername must be at most {USERNAME_MAX_CHARS} characters")
    } else {
        return Ok(());
    };

    let mut error = ValidationError::new("length");
    error.message = Some(message.into());
    Err(error)
}

// -------- POSTS --------
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "content should not be empty"))]
    pub content: String,
    #[validate(length(min = 1, max = 50, message = "category must be between 1 and 50 characters"))]
    pub category: String,
    #[serde(default)]
    pub published: bool,
}

/// Partial update; absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "content should not be empty"))]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "category must be between 1 and 50 characters"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// Query string for post listings. An empty `category` means "all".
#[derive(Serialize, Deserialize, Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    #[serde(default)]
    pub category: Option<String>,
}

impl PostListQuery {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}
