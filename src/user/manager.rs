//! Registers users and checks their credentials.

use crate::{
    AuthenticationError, BusinessRuleError, Error, NewUser, PasswordHash, User, UserId,
    stores::UserStore,
};

/// The business logic for users.
#[derive(Debug, Clone)]
pub struct UserManager<S: UserStore> {
    store: S,
    password_cost: u32,
}

impl<S: UserStore> UserManager<S> {
    /// Create a manager that persists users in `store` and hashes passwords
    /// with the bcrypt `password_cost`.
    pub fn new(store: S, password_cost: u32) -> Self {
        Self {
            store,
            password_cost,
        }
    }

    /// Check that `password` is the password of the user registered with `email`.
    ///
    /// # Errors
    ///
    /// Returns an [AuthenticationError::UserNotFound] if no user has registered
    /// with `email`, an [AuthenticationError::InvalidPassword] if the password
    /// does not match, or any error from the store or from verifying the hash.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = match self.store.get_by_email(email) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::warn!("Failed log in attempt");
                return Err(AuthenticationError::UserNotFound.into());
            }
            Err(error) => return Err(error),
        };

        if !user.password_hash.verify(password)? {
            tracing::warn!("Failed log in attempt");
            return Err(AuthenticationError::InvalidPassword.into());
        }

        tracing::info!("User {} logged in", user.id);

        Ok(user)
    }

    /// Register a new user, storing a hash of their password.
    ///
    /// # Errors
    ///
    /// Returns a [BusinessRuleError::EmailAlreadyRegistered] if another user
    /// has the same email, an [Error::HashingError] if the password could not
    /// be hashed, or any error from the store.
    pub fn register(&mut self, new_user: NewUser) -> Result<User, Error> {
        self.validate_email_uniqueness(&new_user.email)?;

        let password_hash = PasswordHash::from_raw_password(&new_user.password, self.password_cost)?;
        let user = self
            .store
            .create(&new_user.name, &new_user.email, password_hash)?;

        tracing::info!("Registered user {}", user.id);

        Ok(user)
    }

    /// Check that no user has registered with `email`.
    ///
    /// # Errors
    ///
    /// Returns a [BusinessRuleError::EmailAlreadyRegistered] if the email is
    /// taken, or any error from the store.
    pub fn validate_email_uniqueness(&self, email: &str) -> Result<(), Error> {
        if self.store.exists_by_email(email)? {
            tracing::debug!("Rejected registration with a taken email");
            return Err(BusinessRuleError::EmailAlreadyRegistered.into());
        }

        Ok(())
    }

    /// Get the user with `id`, or `None` if there is no such user.
    ///
    /// # Errors
    ///
    /// Returns any error from the store other than [Error::NotFound].
    pub fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        match self.store.get(id) {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => {
                tracing::debug!("No user with ID {id}");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
