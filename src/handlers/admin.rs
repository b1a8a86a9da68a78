// Post management endpoints behind the admin bearer token.

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Extension, Path, Query};
use blog_api::{CreatePostRequest, ErrorEnvelope, PostListQuery, PostResponse, UpdatePostRequest};
use uuid::Uuid;

use crate::auth::extractors::AuthClaims;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::posts::services::PostService;
use crate::response::AppResponse;

/// GET /admin/posts
#[utoipa::path(
    get,
    path = "/admin/posts",
    tag = "Admin",
    params(PostListQuery),
    responses(
        (status = 200, description = "All posts including drafts", body = [PostResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    )
)]
pub async fn list_posts(
    _claims: AuthClaims,
    Extension(service): Extension<Arc<PostService>>,
    Query(query): Query<PostListQuery>,
) -> Result<AppResponse<Vec<PostResponse>>, AppError> {
    let posts = service.list_all(query.category())?;
    Ok(AppResponse::ok(posts))
}

/// GET /admin/posts/{id}
#[utoipa::path(
    get,
    path = "/admin/posts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Unknown post", body = ErrorEnvelope)
    )
)]
pub async fn get_post(
    _claims: AuthClaims,
    Extension(service): Extension<Arc<PostService>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<AppResponse<PostResponse>, AppError> {
    let Path(id) = id?;
    Ok(AppResponse::ok(service.get(id)?))
}

/// POST /admin/posts
#[utoipa::path(
    post,
    path = "/admin/posts",
    tag = "Admin",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    )
)]
pub async fn create_post(
    claims: AuthClaims,
    Extension(service): Extension<Arc<PostService>>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> Result<AppResponse<PostResponse>, AppError> {
    let post = service.create(payload)?;
    tracing::debug!(post_id = %post.id, by = %claims.username, "Create post handled");
    Ok(AppResponse::created(post))
}

/// PUT /admin/posts/{id}
#[utoipa::path(
    put,
    path = "/admin/posts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 404, description = "Unknown post", body = ErrorEnvelope)
    )
)]
pub async fn update_post(
    claims: AuthClaims,
    Extension(service): Extension<Arc<PostService>>,
    id: Result<Path<Uuid>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> Result<AppResponse<PostResponse>, AppError> {
    let Path(id) = id?;
    let post = service.update(id, payload)?;
    tracing::debug!(post_id = %post.id, by = %claims.username, "Update post handled");
    Ok(AppResponse::ok(post))
}

/// DELETE /admin/posts/{id}
#[utoipa::path(
    delete,
    path = "/admin/posts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Unknown post", body = ErrorEnvelope)
    )
)]
pub async fn delete_post(
    claims: AuthClaims,
    Extension(service): Extension<Arc<PostService>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<AppResponse<()>, AppError> {
    let Path(id) = id?;
    service.delete(id)?;
    tracing::debug!(post_id = %id, by = %claims.username, "Delete post handled");
    Ok(AppResponse::no_content())
}
