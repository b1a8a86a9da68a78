use crate::db::DbPool;
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::login_attempt::NewLoginAttempt;
use crate::db::schema::login_attempts;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Failed attempts older than this no longer count toward a lockout.
pub const LOCKOUT_WINDOW_MINUTES: i64 = 15;

pub trait LoginAttemptRepository: Send + Sync {
    fn record(&self, user_id: Option<Uuid>, success: bool) -> Result<(), RepositoryError>;
    /// Failed attempts for `user_id` strictly after `since`.
    fn count_failed_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, RepositoryError>;
}

pub struct PgLoginAttemptRepository {
    pool: DbPool,
}

impl PgLoginAttemptRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LoginAttemptRepository for PgLoginAttemptRepository {
    fn record(&self, user_id: Option<Uuid>, success: bool) -> Result<(), RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(login_attempts::table)
            .values(NewLoginAttempt { user_id, success })
            .execute(&mut conn)?;

        Ok(())
    }

    fn count_failed_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        login_attempts::table
            .filter(login_attempts::user_id.eq(user_id))
            .filter(login_attempts::success.eq(false))
            .filter(login_attempts::attempted_at.gt(since))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(Into::into)
    }
}
