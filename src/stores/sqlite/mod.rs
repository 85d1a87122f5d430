//! SQLite implementations of the stores and a convenience constructor for an
//! [AppState] that uses them.

mod entry;
mod user;

pub use entry::{SQLiteEntryStore, create_entry_table};
pub use user::{SQLiteUserStore, create_user_table};

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteUserStore, SQLiteEntryStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database. Both stores share `db_connection`.
///
/// `password_cost` is the bcrypt cost used when registering users.
///
/// # Errors
///
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(db_connection: Connection, password_cost: u32) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        SQLiteUserStore::new(connection.clone()),
        SQLiteEntryStore::new(connection),
        password_cost,
    ))
}

fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|_| Error::DatabaseLockError)
}
