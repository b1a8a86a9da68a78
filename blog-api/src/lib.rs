//! # blog-api
//!
//! Shared API types for the blog platform.
//! This crate is designed to be WASM-compatible and is used by the backend
//! (`blog-server`) as well as by the admin client (`blog-admin`).
//!
//! ## Features
//!
//! - Request DTOs with declarative validation (ChangeUsernameRequest, CreatePostRequest, ...)
//! - Response DTOs (PostResponse, LoginResponse, ...)
//! - Error envelope (`{success: false, code, message}`)
//! - Generic response wrapper (AppResponse)
//!
//! ## Example
//!
//! ```rust
//! use blog_api::{ChangeUsernameRequest, validation::check};
//!
//! let request = ChangeUsernameRequest {
//!     current_password: "hunter2".to_string(),
//!     new_username: "ab".to_string(),
//! };
//! let errors = check(&request).unwrap_err();
//! assert_eq!(errors[0].field, "newUsername");
//! ```

pub mod error;
pub mod requests;
pub mod responses;
pub mod result;
pub mod validation;

// Re-exports for convenient access
pub use error::{ErrorEnvelope, FieldError};
pub use requests::*;
pub use responses::*;
pub use result::{AppResponse, StatusCode};
