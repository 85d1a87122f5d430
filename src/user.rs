//! Users of the application and the rules for registering and logging them in.

mod manager;

pub use manager::UserManager;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::PasswordHash;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password hash is never serialized so that users can be printed or sent
/// to a client without leaking it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The name the user registered with.
    pub name: String,
    /// The email the user logs in with. No two users share an email.
    pub email: String,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
}

/// The details needed to register a new user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    /// The user's name.
    pub name: String,
    /// The email the user will log in with.
    pub email: String,
    /// The plain text password, hashed before it is stored.
    pub password: String,
}

impl NewUser {
    /// Create the registration details for a user.
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }
}

#[cfg(test)]
mod user_tests {
    use crate::{PasswordHash, User, UserId};

    #[test]
    fn serialized_user_does_not_contain_password_hash() {
        let user = User {
            id: UserId::new(1),
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
            password_hash: PasswordHash::new_unchecked("$2b$04$notarealhash"),
        };

        let json = serde_json::to_string(&user).unwrap();

        assert_eq!(
            json,
            r#"{"id":1,"name":"Ana","email":"ana@example.com"}"#
        );
    }
}
