//! Finance Tracker is the backend for a personal finance tracker.
//!
//! Users register and log in, then record income and expense entries that are
//! validated before they are stored. The balance of a user is the sum of their
//! income minus the sum of their expenses.
//!
//! This library provides the managers that hold the business rules, the store
//! traits they persist through, and SQLite implementations of those stores.

#![warn(missing_docs)]

mod app_state;
mod config;
mod db;
mod entry;
mod logging;
mod password;
mod user;

pub mod stores;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::Config;
pub use db::initialize as initialize_db;
pub use entry::{
    Entry, EntryBuilder, EntryFilter, EntryId, EntryManager, EntryStatus, EntryType,
    ParseEntryStatusError, ParseEntryTypeError, validate_entry,
};
pub use logging::setup_logging;
pub use password::PasswordHash;
pub use user::{NewUser, User, UserId, UserManager};

/// A violated business rule.
///
/// These errors are meant to be shown to the end user as-is, the message of
/// each variant tells the user what to fix.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum BusinessRuleError {
    /// The entry has no description, or only whitespace.
    #[error("Informe uma descrição válida.")]
    InvalidDescription,

    /// The entry has no month, or a month outside of 1 to 12.
    #[error("Informe um mês válido.")]
    InvalidMonth,

    /// The entry has no year, or a year that is not four digits long.
    #[error("Informe um ano válido.")]
    InvalidYear,

    /// The entry does not reference a user.
    #[error("Informe um usuário.")]
    MissingUser,

    /// The entry has no value, or a value that is zero or negative.
    #[error("Informe um valor válido.")]
    InvalidValue,

    /// The entry is neither income nor expense.
    #[error("Informe um tipo de lançamento")]
    MissingEntryType,

    /// Another user has already registered with the email.
    #[error("Já existe um usuário cadastrado com este email.")]
    EmailAlreadyRegistered,
}

/// A failed log in attempt.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    /// No user has registered with the email.
    #[error("Usuário não encontrado para o email informado.")]
    UserNotFound,

    /// The password does not match the one the user registered with.
    #[error("Senha inválida")]
    InvalidPassword,
}

/// The errors that may occur in the application.
///
/// Calling [EntryManager::update] or [EntryManager::delete] with an entry
/// that has never been saved is a bug in the caller and panics instead of
/// returning one of these errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A business rule was violated, the message can be shown to the user.
    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleError),

    /// The user could not be logged in.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging. When
    /// communicating with the user this error should be replaced with a
    /// general error message.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user ID used to create an entry did not match a registered user.
    #[error("the user ID {0} does not refer to a registered user")]
    InvalidUser(UserId),

    /// Tried to update an entry that does not exist
    #[error("tried to update an entry that is not in the database")]
    UpdateMissingEntry,

    /// Tried to delete an entry that does not exist
    #[error("tried to delete an entry that is not in the database")]
    DeleteMissingEntry,

    /// The total of a user's entries does not fit in a decimal.
    #[error("the total of the entries is too large to calculate")]
    BalanceOverflow,

    /// The application was started with unusable settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
