pub mod login_attempt;
pub mod post;
pub mod user;
