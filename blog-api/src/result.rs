use serde::{Deserialize, Serialize};

/// HTTP status codes the blog API answers with.
/// WASM-compatible, independent of `axum::http::StatusCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Ok = 200,
    Created = 201,
    NoContent = 204,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    Conflict = 409,
    TooManyRequests = 429,
    InternalServerError = 500,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn is_success(self) -> bool {
        (200..300).contains(&self.as_u16())
    }
}

/// Generic API response wrapper
///
/// The backend wraps this in a type that implements Axum's `IntoResponse`.
///
/// ```rust
/// use blog_api::{AppResponse, StatusCode};
///
/// let response = AppResponse::ok("data");
/// assert_eq!(response.status, StatusCode::Ok);
///
/// let response: AppResponse<()> = AppResponse::no_content();
/// assert!(response.data.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub status: StatusCode,
}

impl<T> AppResponse<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        Self {
            status,
            data: Some(data),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self { status, data: None }
    }

    /// 200 OK with data
    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::Ok, data)
    }

    /// 201 Created with data
    pub fn created(data: T) -> Self {
        Self::new(StatusCode::Created, data)
    }
}

impl AppResponse<()> {
    /// 204 No Content
    pub fn no_content() -> Self {
        Self::empty(StatusCode::NoContent)
    }
}
