//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    stores::sqlite::{create_entry_table, create_user_table},
};

/// Create the tables for the domain models if they do not exist yet.
///
/// Foreign keys are enabled on `connection` so that entries cannot reference
/// users that do not exist.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must run first.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_entry_table(&transaction)?;

    transaction.commit()?;

    tracing::debug!("Database initialized");

    Ok(())
}
