pub mod login_attempt_repository;
pub mod post_repository;
pub mod user_repository;

pub use login_attempt_repository::{
    LOCKOUT_WINDOW_MINUTES, LoginAttemptRepository, PgLoginAttemptRepository,
};
pub use post_repository::{PgPostRepository, PostFilter, PostRepository};
pub use user_repository::{PgUserRepository, UserRepository};
