use crate::db::DbPool;
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, User};
use crate::db::schema::users;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Persistence for the blog owner account(s).
pub trait UserRepository: Send + Sync {
    fn count(&self) -> Result<i64, RepositoryError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError>;
    /// Fails with `UniqueViolation` when the name is taken.
    fn update_username(&self, id: Uuid, username: &str) -> Result<User, RepositoryError>;
    fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepositoryError>;
    fn update_last_login(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    fn count(&self) -> Result<i64, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        users::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(Into::into)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        users::table
            .filter(users::id.eq(id))
            .first::<User>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        users::table
            .filter(users::username.eq(username))
            .first::<User>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(users::table)
            .values(new_user)
            .get_result::<User>(&mut conn)
            .map_err(Into::into)
    }

    fn update_username(&self, id: Uuid, username: &str) -> Result<User, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set((
                users::username.eq(username),
                users::updated_at.eq(Utc::now()),
            ))
            .get_result::<User>(&mut conn)
            .map_err(Into::into)
    }

    fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn update_last_login(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(users::table.filter(users::id.eq(id)))
            .set(users::last_login_at.eq(Some(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_pool;

    fn repository() -> PgUserRepository {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        PgUserRepository::new(create_pool(&url).expect("pool"))
    }

    fn new_user() -> NewUser {
        NewUser {
            username: format!("u_{}", &Uuid::new_v4().simple().to_string()[..12]),
            password_hash: "test_hash".to_string(),
        }
    }

    #[test]
    #[ignore = "requires a running Postgres reachable through DATABASE_URL"]
    fn create_then_find_by_username() {
        let repo = repository();
        let new_user = new_user();

        let created = repo.create(&new_user).expect("create user");
        let found = repo
            .find_by_username(&new_user.username)
            .expect("query")
            .expect("user exists");

        assert_eq!(found.id, created.id);
        assert!(found.last_login_at.is_none());
    }

    #[test]
    #[ignore = "requires a running Postgres reachable through DATABASE_URL"]
    fn update_username_rejects_taken_name() {
        let repo = repository();
        let first = repo.create(&new_user()).expect("create first");
        let second = repo.create(&new_user()).expect("create second");

        let result = repo.update_username(second.id, &first.username);

        assert!(matches!(result, Err(RepositoryError::UniqueViolation(_))));
    }

    #[test]
    #[ignore = "requires a running Postgres reachable through DATABASE_URL"]
    fn update_last_login_sets_timestamp() {
        let repo = repository();
        let created = repo.create(&new_user()).expect("create user");

        repo.update_last_login(created.id).expect("update");

        let after = repo.find_by_id(created.id).expect("query").expect("exists");
        assert!(after.last_login_at.is_some());
    }
}
