use std::sync::Arc;

use blog_api::{CreatePostRequest, PostResponse, UpdatePostRequest};
use chrono::Utc;
use uuid::Uuid;

use crate::db::Repositories;
use crate::db::models::post::{NewPost, PostChanges};
use crate::db::repositories::{PostFilter, PostRepository};
use crate::error::AppError;
use crate::posts::slug::slugify;

/// Path segments under `/posts/` owned by static routes.
const RESERVED_SLUGS: &[&str] = &["categories"];

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            posts: repositories.posts.clone(),
        }
    }

    /// Published posts for the blog reader, newest first.
    pub fn list_published(&self, category: Option<&str>) -> Result<Vec<PostResponse>, AppError> {
        self.list(category, true)
    }

    /// Every post including drafts, for the admin panel.
    pub fn list_all(&self, category: Option<&str>) -> Result<Vec<PostResponse>, AppError> {
        self.list(category, false)
    }

    pub fn categories(&self) -> Result<Vec<String>, AppError> {
        Ok(self.posts.categories()?)
    }

    pub fn get_published(&self, slug: &str) -> Result<PostResponse, AppError> {
        self.posts
            .find_by_slug(slug)?
            .filter(|post| post.published)
            .map(PostResponse::from)
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    pub fn get(&self, id: Uuid) -> Result<PostResponse, AppError> {
        self.posts
            .find_by_id(id)?
            .map(PostResponse::from)
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    pub fn create(&self, request: CreatePostRequest) -> Result<PostResponse, AppError> {
        let slug = self.unique_slug(&request.title, None)?;
        let post = self.posts.create(&NewPost {
            title: request.title,
            slug,
            description: request.description,
            content: request.content,
            category: request.category,
            published: request.published,
        })?;

        tracing::info!(post_id = %post.id, slug = %post.slug, published = post.published, "Post created");
        Ok(post.into())
    }

    pub fn update(&self, id: Uuid, request: UpdatePostRequest) -> Result<PostResponse, AppError> {
        let current = self
            .posts
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        // A new title re-derives the slug
        let slug = match &request.title {
            Some(title) if *title != current.title => Some(self.unique_slug(title, Some(id))?),
            _ => None,
        };

        let changes = PostChanges {
            title: request.title,
            slug,
            description: request.description,
            content: request.content,
            category: request.category,
            published: request.published,
            updated_at: Utc::now(),
        };
        let post = self.posts.update(id, &changes)?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post updated");
        Ok(post.into())
    }

    pub fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.posts.delete(id)? {
            return Err(AppError::not_found("Post not found"));
        }

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    fn list(&self, category: Option<&str>, published_only: bool) -> Result<Vec<PostResponse>, AppError> {
        let filter = PostFilter {
            category: category.map(str::to_string),
            published_only,
        };

        Ok(self
            .posts
            .list(&filter)?
            .into_iter()
            .map(PostResponse::from)
            .collect())
    }

    fn unique_slug(&self, title: &str, except: Option<Uuid>) -> Result<String, AppError> {
        let base = slugify(title);
        let mut candidate = base.clone();
        while RESERVED_SLUGS.contains(&candidate.as_str())
            || self.posts.slug_taken(&candidate, except)?
        {
            let suffix = Uuid::new_v4().simple().to_string();
            candidate = format!("{base}-{}", &suffix[..8]);
        }
        Ok(candidate)
    }
}
