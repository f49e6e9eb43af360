// LinkSafe password policy
// Applied when a password is first set on a folder or link, before hashing.

use crate::services::crypto_service::hash_password;
use crate::types::errors::ValidationError;

/// Minimum number of characters for a newly set password.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Checks a new password against its confirmation.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validates a new password and returns its hash.
pub fn hash_new_password(password: &str, confirmation: &str) -> Result<String, ValidationError> {
    validate_new_password(password, confirmation)?;
    Ok(hash_password(password))
}
