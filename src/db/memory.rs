//! Process-local repositories. Used when no `DATABASE_URL` is configured in
//! development, and by the test suite.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::db::error::RepositoryError;
use crate::db::models::login_attempt::LoginAttempt;
use crate::db::models::post::{NewPost, Post, PostChanges};
use crate::db::models::user::{NewUser, User};
use crate::db::repositories::{
    LOCKOUT_WINDOW_MINUTES, LoginAttemptRepository, PostFilter, PostRepository, UserRepository,
};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
    lock.read()
        .map_err(|_| RepositoryError::Database("in-memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
    lock.write()
        .map_err(|_| RepositoryError::Database("in-memory store lock poisoned".to_string()))
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl UserRepository for InMemoryUserRepository {
    fn count(&self) -> Result<i64, RepositoryError> {
        let users = read(&self.users)?;
        i64::try_from(users.len()).map_err(|e| RepositoryError::Database(e.to_string()))
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(read(&self.users)?.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(read(&self.users)?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut users = write(&self.users)?;
        if users.values().any(|u| u.username == new_user.username) {
            return Err(RepositoryError::UniqueViolation(
                "users_username_key".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn update_username(&self, id: Uuid, username: &str) -> Result<User, RepositoryError> {
        let mut users = write(&self.users)?;
        if users.values().any(|u| u.id != id && u.username == username) {
            return Err(RepositoryError::UniqueViolation(
                "users_username_key".to_string(),
            ));
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound("Record not found".to_string()))?;
        user.username = username.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepositoryError> {
        if let Some(user) = write(&self.users)?.get_mut(&id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    fn update_last_login(&self, id: Uuid) -> Result<(), RepositoryError> {
        if let Some(user) = write(&self.users)?.get_mut(&id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl PostRepository for InMemoryPostRepository {
    fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepositoryError> {
        let mut posts: Vec<Post> = read(&self.posts)?
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let mut categories: Vec<String> = read(&self.posts)?
            .values()
            .filter(|p| p.published)
            .map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepositoryError> {
        Ok(read(&self.posts)?.get(&id).cloned())
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        Ok(read(&self.posts)?.values().find(|p| p.slug == slug).cloned())
    }

    fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, RepositoryError> {
        Ok(read(&self.posts)?
            .values()
            .any(|p| p.slug == slug && Some(p.id) != except))
    }

    fn create(&self, new_post: &NewPost) -> Result<Post, RepositoryError> {
        let mut posts = write(&self.posts)?;
        if posts.values().any(|p| p.slug == new_post.slug) {
            return Err(RepositoryError::UniqueViolation("posts_slug_key".to_string()));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title.clone(),
            slug: new_post.slug.clone(),
            description: new_post.description.clone(),
            content: new_post.content.clone(),
            category: new_post.category.clone(),
            published: new_post.published,
            created_at: now,
            updated_at: now,
        };
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    fn update(&self, id: Uuid, changes: &PostChanges) -> Result<Post, RepositoryError> {
        let mut posts = write(&self.posts)?;
        if let Some(slug) = &changes.slug
            && posts.values().any(|p| p.id != id && p.slug == *slug)
        {
            return Err(RepositoryError::UniqueViolation("posts_slug_key".to_string()));
        }

        let post = posts
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound("Record not found".to_string()))?;
        changes.apply_to(post);
        Ok(post.clone())
    }

    fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(write(&self.posts)?.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryLoginAttemptRepository {
    attempts: RwLock<Vec<LoginAttempt>>,
}

impl LoginAttemptRepository for InMemoryLoginAttemptRepository {
    fn record(&self, user_id: Option<Uuid>, success: bool) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let cutoff = now - Duration::minutes(LOCKOUT_WINDOW_MINUTES);

        let mut attempts = write(&self.attempts)?;
        attempts.retain(|a| a.attempted_at > cutoff);
        attempts.push(LoginAttempt {
            id: Uuid::new_v4(),
            user_id,
            success,
            attempted_at: now,
        });
        Ok(())
    }

    fn count_failed_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let failed = read(&self.attempts)?
            .iter()
            .filter(|a| a.user_id == Some(user_id) && !a.success && a.attempted_at > since)
            .count();
        i64::try_from(failed).map_err(|e| RepositoryError::Database(e.to_string()))
    }
}
