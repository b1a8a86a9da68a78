// src/auth/services.rs

use std::sync::Arc;

use axum::http::StatusCode;
use blog_api::{ChangeUsernameRequest, LoginRequest, LoginResponse, UserResponse};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::jwt::JwtManager;
use crate::auth::password::PasswordManager;
use crate::db::Repositories;
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, User};
use crate::db::repositories::{LOCKOUT_WINDOW_MINUTES, LoginAttemptRepository, UserRepository};
use crate::error::AppError;

const MAX_FAILED_ATTEMPTS: i64 = 5;

pub struct AuthService {
    jwt_manager: JwtManager,
    users: Arc<dyn UserRepository>,
    login_attempts: Arc<dyn LoginAttemptRepository>,
}

impl AuthService {
    pub fn new(jwt_manager: JwtManager, repositories: &Repositories) -> Self {
        Self {
            jwt_manager,
            users: repositories.users.clone(),
            login_attempts: repositories.login_attempts.clone(),
        }
    }

    /// Creates the blog owner when no account exists yet.
    /// Returns `None` when an account is already present.
    pub fn ensure_owner(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserResponse>, AppError> {
        if self.users.count()? > 0 {
            return Ok(None);
        }

        let password_hash = PasswordManager::hash(password)?;
        let owner = self.users.create(&NewUser {
            username: username.to_string(),
            password_hash,
        })?;

        tracing::info!(user_id = %owner.id, username = %owner.username, "Created blog owner account");
        Ok(Some(owner.into()))
    }

    /// Logs a user in and issues an access token.
    pub fn login(&self, login_request: &LoginRequest) -> Result<LoginResponse, AppError> {
        let Some(user) = self.users.find_by_username(&login_request.username)? else {
            self.record_attempt(None, false);
            return Err(AppError::InvalidCredentials);
        };

        // Brute-force protection
        let window_start = Utc::now() - Duration::minutes(LOCKOUT_WINDOW_MINUTES);
        let failed_count = self
            .login_attempts
            .count_failed_since(user.id, window_start)
            .inspect_err(|e| tracing::error!(user_id = %user.id, "Lockout check failed: {e}"))?;
        if failed_count >= MAX_FAILED_ATTEMPTS {
            tracing::warn!(user_id = %user.id, failed_count, "Login refused, account locked");
            return Err(AppError::TooManyAttempts(format!(
                "Account temporarily locked after {MAX_FAILED_ATTEMPTS} failed attempts. Try again in {LOCKOUT_WINDOW_MINUTES} minutes."
            )));
        }

        if !PasswordManager::verify(&login_request.password, &user.password_hash)? {
            self.record_attempt(Some(user.id), false);
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self
            .jwt_manager
            .generate_access_token(user.id, &user.username)?;

        self.users.update_last_login(user.id)?;
        self.record_attempt(Some(user.id), true);

        let user = self
            .users
            .find_by_id(user.id)?
            .ok_or_else(|| AppError::internal("User disappeared during login"))?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_manager.expires_in(),
            user: user.into(),
        })
    }

    pub fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        self.find_user(user_id).map(UserResponse::from)
    }

    /// Renames the account after confirming the current password.
    pub fn change_username(
        &self,
        user_id: Uuid,
        request: &ChangeUsernameRequest,
    ) -> Result<UserResponse, AppError> {
        let user = self.find_user(user_id)?;

        if !PasswordManager::verify(&request.current_password, &user.password_hash)? {
            return Err(AppError::InvalidPassword);
        }

        if user.username == request.new_username {
            return Err(AppError::custom(
                StatusCode::BAD_REQUEST,
                "USERNAME_UNCHANGED",
                "New username must differ from the current one",
            ));
        }

        if self.users.find_by_username(&request.new_username)?.is_some() {
            return Err(AppError::UsernameTaken);
        }

        let updated = self
            .users
            .update_username(user_id, &request.new_username)
            .map_err(|e| match e {
                RepositoryError::UniqueViolation(_) => AppError::UsernameTaken,
                other => AppError::from(other),
            })?;

        tracing::info!(user_id = %user_id, from = %user.username, to = %updated.username, "Username changed");
        Ok(updated.into())
    }

    /// Replaces the password after confirming the current one.
    pub fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !PasswordManager::is_strong(new_password) {
            return Err(AppError::WeakPassword(
                "Password must be at least 8 characters with uppercase, lowercase and numbers"
                    .to_string(),
            ));
        }

        let user = self.find_user(user_id)?;
        if !PasswordManager::verify(current_password, &user.password_hash)? {
            return Err(AppError::InvalidPassword);
        }

        let new_hash = PasswordManager::hash(new_password)?;
        self.users.update_password(user_id, &new_hash)?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    fn find_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn record_attempt(&self, user_id: Option<Uuid>, success: bool) {
        if let Err(e) = self.login_attempts.record(user_id, success) {
            tracing::error!("Failed to record login attempt: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "owner";
    const PASSWORD: &str = "OwnerPass123";

    fn service() -> AuthService {
        let service = AuthService::new(
            JwtManager::new("auth_service_test_secret", 1),
            &Repositories::in_memory(),
        );
        service
            .ensure_owner(OWNER, PASSWORD)
            .expect("seed owner")
            .expect("owner created");
        service
    }

    fn login(service: &AuthService, password: &str) -> Result<LoginResponse, AppError> {
        service.login(&LoginRequest {
            username: OWNER.to_string(),
            password: password.to_string(),
        })
    }

    fn rename(current_password: &str, new_username: &str) -> ChangeUsernameRequest {
        ChangeUsernameRequest {
            current_password: current_password.to_string(),
            new_username: new_username.to_string(),
        }
    }

    #[test]
    fn ensure_owner_only_seeds_empty_store() {
        let service = service();
        assert!(service.ensure_owner("other", PASSWORD).unwrap().is_none());
    }

    #[test]
    fn login_succeeds_with_valid_credentials() {
        let service = service();

        let response = login(&service, PASSWORD).expect("Login should succeed");

        assert_eq!(response.user.username, OWNER);
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert!(response.user.last_login_at.is_some());
    }

    #[test]
    fn login_fails_with_wrong_password() {
        let service = service();
        assert!(matches!(
            login(&service, "WrongPass123"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn login_fails_when_user_not_found() {
        let service = service();
        let result = service.login(&LoginRequest {
            username: "nobody".to_string(),
            password: PASSWORD.to_string(),
        });
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn login_locks_after_repeated_failures() {
        let service = service();
        for _ in 0..MAX_FAILED_ATTEMPTS {
            let _ = login(&service, "WrongPass123");
        }

        assert!(matches!(
            login(&service, PASSWORD),
            Err(AppError::TooManyAttempts(_))
        ));
    }

    struct UnavailableAttempts;

    impl LoginAttemptRepository for UnavailableAttempts {
        fn record(&self, _user_id: Option<Uuid>, _success: bool) -> Result<(), RepositoryError> {
            Err(RepositoryError::Database("attempts table unavailable".to_string()))
        }

        fn count_failed_since(
            &self,
            _user_id: Uuid,
            _since: chrono::DateTime<Utc>,
        ) -> Result<i64, RepositoryError> {
            Err(RepositoryError::Database("attempts table unavailable".to_string()))
        }
    }

    #[test]
    fn login_fails_closed_when_lockout_check_fails() {
        let repositories = Repositories {
            login_attempts: Arc::new(UnavailableAttempts),
            ..Repositories::in_memory()
        };
        let service = AuthService::new(JwtManager::new("secret", 1), &repositories);
        service.ensure_owner(OWNER, PASSWORD).unwrap();

        let result = login(&service, PASSWORD);

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[test]
    fn change_username_requires_current_password() {
        let service = service();
        let user_id = login(&service, PASSWORD).unwrap().user.id;

        let result = service.change_username(user_id, &rename("WrongPass123", "writer"));

        assert!(matches!(result, Err(AppError::InvalidPassword)));
        assert_eq!(service.current_user(user_id).unwrap().username, OWNER);
    }

    #[test]
    fn change_username_updates_account() {
        let service = service();
        let user_id = login(&service, PASSWORD).unwrap().user.id;

        let updated = service
            .change_username(user_id, &rename(PASSWORD, "writer"))
            .expect("rename");

        assert_eq!(updated.username, "writer");
        let relogin = service.login(&LoginRequest {
            username: "writer".to_string(),
            password: PASSWORD.to_string(),
        });
        assert!(relogin.is_ok());
    }

    #[test]
    fn change_username_rejects_taken_name() {
        let repositories = Repositories::in_memory();
        let service = AuthService::new(JwtManager::new("secret", 1), &repositories);
        service.ensure_owner(OWNER, PASSWORD).unwrap();
        repositories
            .users
            .create(&NewUser {
                username: "taken".to_string(),
                password_hash: "irrelevant".to_string(),
            })
            .unwrap();
        let user_id = login(&service, PASSWORD).unwrap().user.id;

        let result = service.change_username(user_id, &rename(PASSWORD, "taken"));

        assert!(matches!(result, Err(AppError::UsernameTaken)));
    }

    #[test]
    fn change_username_rejects_same_name() {
        let service = service();
        let user_id = login(&service, PASSWORD).unwrap().user.id;

        let err = service
            .change_username(user_id, &rename(PASSWORD, OWNER))
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn change_password_succeeds_with_correct_current_password() {
        let service = service();
        let user_id = login(&service, PASSWORD).unwrap().user.id;

        service
            .change_password(user_id, PASSWORD, "NewPass456")
            .expect("Change password should succeed");

        assert!(login(&service, "NewPass456").is_ok());
    }

    #[test]
    fn change_password_rejects_weak_password() {
        let service = service();
        let user_id = login(&service, PASSWORD).unwrap().user.id;

        let result = service.change_password(user_id, PASSWORD, "weak");

        assert!(matches!(result, Err(AppError::WeakPassword(_))));
    }

    #[test]
    fn change_password_fails_when_current_password_is_wrong() {
        let service = service();
        let user_id = login(&service, PASSWORD).unwrap().user.id;

        let result = service.change_password(user_id, "WrongOld123", "NewPass456");

        assert!(matches!(result, Err(AppError::InvalidPassword)));
    }
}
