// Public, read-only endpoints used by the blog reader.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use blog_api::{ErrorEnvelope, PostListQuery, PostResponse};

use crate::error::AppError;
use crate::posts::services::PostService;
use crate::response::AppResponse;

/// GET /posts
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    params(PostListQuery),
    responses(
        (status = 200, description = "Published posts, newest first", body = [PostResponse])
    )
)]
pub async fn list_posts(
    State(service): State<Arc<PostService>>,
    Query(query): Query<PostListQuery>,
) -> Result<AppResponse<Vec<PostResponse>>, AppError> {
    let posts = service.list_published(query.category())?;
    Ok(AppResponse::ok(posts))
}

/// GET /posts/categories
#[utoipa::path(
    get,
    path = "/posts/categories",
    tag = "Posts",
    responses(
        (status = 200, description = "Categories of published posts", body = [String])
    )
)]
pub async fn list_categories(
    State(service): State<Arc<PostService>>,
) -> Result<AppResponse<Vec<String>>, AppError> {
    Ok(AppResponse::ok(service.categories()?))
}

/// GET /posts/{slug}
#[utoipa::path(
    get,
    path = "/posts/{slug}",
    tag = "Posts",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Published post", body = PostResponse),
        (status = 404, description = "No published post with this slug", body = ErrorEnvelope)
    )
)]
pub async fn get_post(
    State(service): State<Arc<PostService>>,
    Path(slug): Path<String>,
) -> Result<AppResponse<PostResponse>, AppError> {
    let post = service.get_published(&slug)?;
    Ok(AppResponse::ok(post))
}
