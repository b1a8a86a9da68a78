use crate::db::schema::posts;
use blog_api::PostResponse;
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use uuid::Uuid;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub category: String,
    pub published: bool,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub category: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        PostResponse {
            id: post.id,
            title: post.title,
            slug: post.slug,
            description: post.description,
            content: post.content,
            category: post.category,
            published: post.published,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Column changes for a post update; `None` leaves the column untouched.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = posts)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl PostChanges {
    /// Applies the changes onto an in-memory row.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title.clone_from(title);
        }
        if let Some(slug) = &self.slug {
            post.slug.clone_from(slug);
        }
        if let Some(description) = &self.description {
            post.description.clone_from(description);
        }
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
        if let Some(category) = &self.category {
            post.category.clone_from(category);
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        post.updated_at = self.updated_at;
    }
}
