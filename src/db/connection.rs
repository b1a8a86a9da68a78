use super::{DbConnection, DbPool};
use crate::db::error::RepositoryError;
use anyhow::{Result, anyhow};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;

const POOL_MAX_SIZE: u32 = 5;

/// Builds the Postgres pool. Fails fast when the database is unreachable.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    diesel::r2d2::Pool::builder()
        .max_size(POOL_MAX_SIZE)
        .build(manager)
        .map_err(|e| anyhow!("Failed to create database pool: {e}"))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection, RepositoryError> {
    pool.get().map_err(RepositoryError::from)
}
