use crate::db::DbPool;
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::post::{NewPost, Post, PostChanges};
use crate::db::schema::posts;
use diesel::prelude::*;
use uuid::Uuid;

/// Listing criteria. `category: None` means every category.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub published_only: bool,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        (!self.published_only || post.published)
            && self.category.as_ref().is_none_or(|c| *c == post.category)
    }
}

pub trait PostRepository: Send + Sync {
    /// Newest first.
    fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepositoryError>;
    /// Distinct categories of published posts, sorted.
    fn categories(&self) -> Result<Vec<String>, RepositoryError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepositoryError>;
    fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError>;
    /// Whether another post (not `except`) already uses `slug`.
    fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepositoryError>;
    fn create(&self, new_post: &NewPost) -> Result<Post, RepositoryError>;
    /// Fails with `NotFound` when no post has this id.
    fn update(&self, id: Uuid, changes: &PostChanges) -> Result<Post, RepositoryError>;
    /// Returns `false` when nothing was deleted.
    fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

pub struct PgPostRepository {
    pool: DbPool,
}

impl PgPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PostRepository for PgPostRepository {
    fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = posts::table.into_boxed();
        if let Some(category) = &filter.category {
            query = query.filter(posts::category.eq(category.as_str()));
        }
        if filter.published_only {
            query = query.filter(posts::published.eq(true));
        }

        query
            .order((posts::created_at.desc(), posts::id.desc()))
            .load::<Post>(&mut conn)
            .map_err(Into::into)
    }

    fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        posts::table
            .filter(posts::published.eq(true))
            .select(posts::category)
            .distinct()
            .order(posts::category.asc())
            .load::<String>(&mut conn)
            .map_err(Into::into)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        posts::table
            .filter(posts::id.eq(id))
            .first::<Post>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        posts::table
            .filter(posts::slug.eq(slug))
            .first::<Post>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        let same_slug = posts::table.filter(posts::slug.eq(slug));
        let count = match except {
            Some(id) => same_slug
                .filter(posts::id.ne(id))
                .count()
                .get_result::<i64>(&mut conn)?,
            None => same_slug.count().get_result::<i64>(&mut conn)?,
        };

        Ok(count > 0)
    }

    fn create(&self, new_post: &NewPost) -> Result<Post, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(posts::table)
            .values(new_post)
            .get_result::<Post>(&mut conn)
            .map_err(Into::into)
    }

    fn update(&self, id: Uuid, changes: &PostChanges) -> Result<Post, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(posts::table.filter(posts::id.eq(id)))
            .set(changes)
            .get_result::<Post>(&mut conn)
            .map_err(Into::into)
    }

    fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        let deleted = diesel::delete(posts::table.filter(posts::id.eq(id))).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
