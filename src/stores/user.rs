//! Defines the user store trait.

use crate::{Error, PasswordHash, User, UserId};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Implementers must reject an email that is already in use with
    /// [BusinessRuleError::EmailAlreadyRegistered](crate::BusinessRuleError::EmailAlreadyRegistered),
    /// even if the caller checked beforehand.
    fn create(
        &mut self,
        name: &str,
        email: &str,
        password_hash: PasswordHash,
    ) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserId) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;

    /// Whether a user has registered with `email`.
    fn exists_by_email(&self, email: &str) -> Result<bool, Error>;
}
