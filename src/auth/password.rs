use bcrypt::{hash, verify};

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;
// Lowest cost bcrypt accepts (its own MIN_COST is private). Tests only.
#[cfg(test)]
const HASH_COST: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(bcrypt::BcryptError),
    #[error("Password verification failed: {0}")]
    VerificationFailed(bcrypt::BcryptError),
}

pub struct PasswordManager;

impl PasswordManager {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        hash(password, HASH_COST).map_err(PasswordError::HashingFailed)
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        verify(password, hash).map_err(PasswordError::VerificationFailed)
    }

    /// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
    pub fn is_strong(password: &str) -> bool {
        password.chars().count() >= 8
            && password.chars().any(char::is_uppercase)
            && password.chars().any(char::is_lowercase)
            && password.chars().any(|c| c.is_ascii_digit())
    }
}
