//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    BusinessRuleError, Error, PasswordHash, User, UserId, stores::UserStore,
};

use super::lock;

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns a [BusinessRuleError::EmailAlreadyRegistered] if the email is
    /// taken, [Error::DatabaseLockError] if the connection lock is poisoned,
    /// or [Error::SqlError] if another SQL related error occurred.
    fn create(
        &mut self,
        name: &str,
        email: &str,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let connection = lock(&self.connection)?;

        connection
            .execute(
                "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)",
                (name, email, password_hash.as_ref()),
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                    },
                    Some(ref desc),
                ) if desc.contains("email") => {
                    Error::BusinessRule(BusinessRuleError::EmailAlreadyRegistered)
                }
                error => error.into(),
            })?;

        let id = UserId::new(connection.last_insert_rowid());

        Ok(User {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash,
        })
    }

    /// Get the user from the database that has the specified `id`, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified ID or [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserId) -> Result<User, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, email, password FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], map_user_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `email` address, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified email or [Error::SqlError] there are SQL related errors.
    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, email, password FROM user WHERE email = :email")?
            .query_row(&[(":email", &email)], map_user_row)
            .map_err(|e| e.into())
    }

    fn exists_by_email(&self, email: &str) -> Result<bool, Error> {
        lock(&self.connection)?
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM user WHERE email = ?1)",
                (email,),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let name = row.get(1)?;
    let email = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserId::new(raw_id),
        name,
        email,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
