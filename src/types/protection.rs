//! Password protection contract shared by folders and links.

use super::errors::ValidationError;

/// An entity that may be gated behind a password.
pub trait Protected {
    fn id(&self) -> &str;
    fn is_private(&self) -> bool;
    fn password_hash(&self) -> Option<&str>;

    /// Checks `is_private <=> password_hash.is_some()`.
    fn check_protection(&self) -> Result<(), ValidationError> {
        match (self.is_private(), self.password_hash()) {
            (true, None) | (true, Some("")) => Err(ValidationError::MissingPasswordHash(self.id().to_string())),
            (false, Some(_)) => Err(ValidationError::UnexpectedPasswordHash(
                self.id().to_string(),
            )),
            _ => Ok(()),
        }
    }
}
