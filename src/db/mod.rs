pub mod connection;
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;

use std::sync::Arc;

use diesel::PgConnection;
use diesel::r2d2::{self, ConnectionManager};

use repositories::{
    LoginAttemptRepository, PgLoginAttemptRepository, PgPostRepository, PgUserRepository,
    PostRepository, UserRepository,
};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Storage handles shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub login_attempts: Arc<dyn LoginAttemptRepository>,
}

impl Repositories {
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            login_attempts: Arc::new(PgLoginAttemptRepository::new(pool.clone())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::InMemoryUserRepository::default()),
            posts: Arc::new(memory::InMemoryPostRepository::default()),
            login_attempts: Arc::new(memory::InMemoryLoginAttemptRepository::default()),
        }
    }
}
