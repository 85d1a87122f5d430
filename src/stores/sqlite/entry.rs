//! Implements a SQLite backed entry store.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{
    Connection, Row, ToSql, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, Value, ValueRef},
};
use rust_decimal::Decimal;

use crate::{
    Entry, EntryFilter, EntryId, EntryStatus, EntryType, Error, UserId, stores::EntryStore,
};

use super::lock;

const SELECT_ENTRY: &str =
    "SELECT id, description, month, year, value, type, status, user_id FROM entry";

/// Stores entries in a SQLite database.
///
/// Entries reference users, so the user table must be set up in the same
/// database.
#[derive(Debug, Clone)]
pub struct SQLiteEntryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteEntryStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl EntryStore for SQLiteEntryStore {
    /// Create a new entry in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidUser] if the entry's user ID does not refer to a registered user,
    /// - or [Error::SqlError] if there is some other SQL error, e.g. a required field is missing.
    fn create(&mut self, entry: &Entry) -> Result<Entry, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare(
                "INSERT INTO entry (description, month, year, value, type, status, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, description, month, year, value, type, status, user_id",
            )?
            .query_row(
                (
                    &entry.description,
                    entry.month,
                    entry.year,
                    entry.value.map(encode_value),
                    entry.entry_type,
                    entry.status,
                    entry.user_id.map(|user_id| user_id.as_i64()),
                ),
                map_entry_row,
            )
            .map_err(|error| map_write_error(error, entry))
    }

    /// Replace the fields of the entry with `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingEntry] if there is no entry with `id`,
    /// - [Error::InvalidUser] if the entry's user ID does not refer to a registered user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, id: EntryId, entry: &Entry) -> Result<Entry, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare(
                "UPDATE entry
                 SET description = ?1, month = ?2, year = ?3, value = ?4, type = ?5, status = ?6, user_id = ?7
                 WHERE id = ?8
                 RETURNING id, description, month, year, value, type, status, user_id",
            )?
            .query_row(
                (
                    &entry.description,
                    entry.month,
                    entry.year,
                    entry.value.map(encode_value),
                    entry.entry_type,
                    entry.status,
                    entry.user_id.map(|user_id| user_id.as_i64()),
                    id,
                ),
                map_entry_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingEntry,
                error => map_write_error(error, entry),
            })
    }

    /// Delete the entry with `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingEntry] if there is no entry with `id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: EntryId) -> Result<(), Error> {
        let rows_affected = lock(&self.connection)?.execute("DELETE FROM entry WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingEntry);
        }

        Ok(())
    }

    /// Retrieve an entry in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid entry,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: EntryId) -> Result<Entry, Error> {
        let entry = lock(&self.connection)?
            .prepare(&format!("{SELECT_ENTRY} WHERE id = :id"))?
            .query_row(&[(":id", &id)], map_entry_row)?;

        Ok(entry)
    }

    /// Query for the entries that match `filter`, ordered by ID.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn query(&self, filter: &EntryFilter) -> Result<Vec<Entry>, Error> {
        let (where_clause, query_parameters) = build_where_clause(filter);
        let query_string = format!("{SELECT_ENTRY}{where_clause} ORDER BY id ASC");
        let params = params_from_iter(query_parameters.iter());

        lock(&self.connection)?
            .prepare(&query_string)?
            .query_map(params, map_entry_row)?
            .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
            .collect()
    }

    /// Sum the values of a user's entries of one type.
    ///
    /// Values are summed as decimals, rather than with SQL's `SUM`, since
    /// SQLite would convert the stored text to floating point.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::BalanceOverflow] if the sum is too large for a [Decimal],
    /// - or [Error::SqlError] if there is a SQL error.
    fn sum_value_by_user_and_type(
        &self,
        user_id: UserId,
        entry_type: EntryType,
    ) -> Result<Option<Decimal>, Error> {
        let connection = lock(&self.connection)?;
        let mut statement =
            connection.prepare("SELECT value FROM entry WHERE user_id = ?1 AND type = ?2")?;
        let values = statement.query_map((user_id.as_i64(), entry_type), |row| {
            decode_value(row, 0)
        })?;

        let mut total = None;
        for value in values {
            let sum = total.unwrap_or(Decimal::ZERO).checked_add(value?);
            total = Some(sum.ok_or(Error::BalanceOverflow)?);
        }

        Ok(total)
    }
}

/// Build the `WHERE` clause with one predicate per field set in `filter`.
///
/// Returns the clause, with a leading space, or an empty string if no field is
/// set, and the parameters in the order they are numbered in the clause.
fn build_where_clause(filter: &EntryFilter) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    let mut add_predicate = |column: &str, value: Value| {
        query_parameters.push(value);
        where_clause_parts.push(format!("{column} = ?{}", query_parameters.len()));
    };

    if let Some(id) = filter.id {
        add_predicate("id", Value::Integer(id));
    }
    if let Some(description) = &filter.description {
        add_predicate("description", Value::Text(description.clone()));
    }
    if let Some(month) = filter.month {
        add_predicate("month", Value::Integer(month.into()));
    }
    if let Some(year) = filter.year {
        add_predicate("year", Value::Integer(year.into()));
    }
    if let Some(value) = filter.value {
        add_predicate("value", Value::Text(encode_value(value)));
    }
    if let Some(entry_type) = filter.entry_type {
        add_predicate("type", Value::Text(entry_type.as_str().to_owned()));
    }
    if let Some(status) = filter.status {
        add_predicate("status", Value::Text(status.as_str().to_owned()));
    }
    if let Some(user_id) = filter.user_id {
        add_predicate("user_id", Value::Integer(user_id.as_i64()));
    }

    if where_clause_parts.is_empty() {
        (String::new(), query_parameters)
    } else {
        (
            format!(" WHERE {}", where_clause_parts.join(" AND ")),
            query_parameters,
        )
    }
}

fn map_write_error(error: rusqlite::Error, entry: &Entry) -> Error {
    match (error, entry.user_id) {
        (
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ),
            Some(user_id),
        ) => Error::InvalidUser(user_id),
        (error, _) => error.into(),
    }
}

/// Values are stored as normalised decimal text, e.g. `100.5` rather than
/// `100.50`, so that equal values compare equal in SQL.
fn encode_value(value: Decimal) -> String {
    value.normalize().to_string()
}

fn decode_value(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw_value: String = row.get(index)?;

    Decimal::from_str(&raw_value)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Create the entry table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS entry (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                value TEXT NOT NULL,
                type TEXT NOT NULL,
                status TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE
                );

        CREATE INDEX IF NOT EXISTS idx_entry_user_type ON entry(user_id, type);",
    )?;

    Ok(())
}

/// Map a database row to an Entry.
fn map_entry_row(row: &Row) -> Result<Entry, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let month = row.get(2)?;
    let year = row.get(3)?;
    let value = decode_value(row, 4)?;
    let entry_type = row.get(5)?;
    let status = row.get(6)?;
    let user_id = UserId::new(row.get(7)?);

    Ok(Entry {
        id: Some(id),
        description: Some(description),
        month: Some(month),
        year: Some(year),
        value: Some(value),
        entry_type: Some(entry_type),
        status,
        user_id: Some(user_id),
    })
}

impl ToSql for EntryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for EntryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        EntryType::from_str(value.as_str()?).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for EntryStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for EntryStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        EntryStatus::from_str(value.as_str()?).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod sqlite_entry_store_tests {
    use rust_decimal::Decimal;

    use crate::{
        Entry, EntryFilter, EntryStatus, EntryType, Error, PasswordHash, UserId,
        stores::{EntryStore, UserStore, sqlite::SQLiteUserStore},
        test_utils::get_test_connection,
    };

    use super::SQLiteEntryStore;

    fn get_store_and_user() -> (SQLiteEntryStore, UserId) {
        let connection = get_test_connection();
        let user = SQLiteUserStore::new(connection.clone())
            .create("Ana", "ana@example.com", PasswordHash::new_unchecked("hunter2"))
            .expect("Could not create user");

        (SQLiteEntryStore::new(connection), user.id)
    }

    fn entry_for(user_id: UserId) -> Entry {
        Entry::build("Salary", Decimal::new(300050, 2), EntryType::Income)
            .month(1)
            .year(2024)
            .user_id(user_id)
            .finalize()
    }

    #[test]
    fn create_succeeds() {
        let (mut store, user_id) = get_store_and_user();
        let entry = entry_for(user_id);

        let created = store.create(&entry).unwrap();

        assert!(created.id.is_some_and(|id| id > 0));
        assert_eq!(Entry { id: None, ..created }, entry);
    }

    #[test]
    fn create_ignores_existing_id() {
        let (mut store, user_id) = get_store_and_user();
        let entry = Entry {
            id: Some(999),
            ..entry_for(user_id)
        };

        let created = store.create(&entry).unwrap();

        assert_eq!(created.id, Some(1));
    }

    #[test]
    fn create_fails_on_invalid_user_id() {
        let (mut store, _) = get_store_and_user();
        let user_id = UserId::new(42);

        let result = store.create(&entry_for(user_id));

        assert_eq!(result, Err(Error::InvalidUser(user_id)));
    }

    #[test]
    fn create_fails_on_missing_field() {
        let (mut store, user_id) = get_store_and_user();
        let entry = Entry {
            description: None,
            ..entry_for(user_id)
        };

        let result = store.create(&entry);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_succeeds() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(&entry_for(user_id)).unwrap();

        let got = store.get(created.id.unwrap());

        assert_eq!(got, Ok(created));
    }

    #[test]
    fn get_fails_on_missing_id() {
        let (store, _) = get_store_and_user();

        assert_eq!(store.get(1), Err(Error::NotFound));
    }

    #[test]
    fn update_succeeds() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(&entry_for(user_id)).unwrap();
        let id = created.id.unwrap();
        let changed = Entry {
            description: Some("Bonus".to_owned()),
            status: EntryStatus::Settled,
            ..created
        };

        let updated = store.update(id, &changed).unwrap();

        assert_eq!(updated, changed);
        assert_eq!(store.get(id), Ok(changed));
    }

    #[test]
    fn update_fails_on_missing_id() {
        let (mut store, user_id) = get_store_and_user();

        let result = store.update(7, &entry_for(user_id));

        assert_eq!(result, Err(Error::UpdateMissingEntry));
    }

    #[test]
    fn update_fails_on_invalid_user_id() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(&entry_for(user_id)).unwrap();
        let other_user = UserId::new(42);
        let changed = Entry {
            user_id: Some(other_user),
            ..created.clone()
        };

        let result = store.update(created.id.unwrap(), &changed);

        assert_eq!(result, Err(Error::InvalidUser(other_user)));
    }

    #[test]
    fn delete_succeeds() {
        let (mut store, user_id) = get_store_and_user();
        let id = store.create(&entry_for(user_id)).unwrap().id.unwrap();

        store.delete(id).unwrap();

        assert_eq!(store.get(id), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_missing_id() {
        let (mut store, _) = get_store_and_user();

        assert_eq!(store.delete(3), Err(Error::DeleteMissingEntry));
    }

    #[test]
    fn query_with_empty_filter_returns_everything() {
        let (mut store, user_id) = get_store_and_user();
        let want = vec![
            store.create(&entry_for(user_id)).unwrap(),
            store
                .create(&Entry {
                    description: Some("Rent".to_owned()),
                    entry_type: Some(EntryType::Expense),
                    ..entry_for(user_id)
                })
                .unwrap(),
        ];

        let got = store.query(&EntryFilter::default()).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn query_matches_each_field_exactly() {
        let (mut store, user_id) = get_store_and_user();
        let salary = store.create(&entry_for(user_id)).unwrap();
        let rent = store
            .create(&Entry {
                description: Some("Rent".to_owned()),
                month: Some(2),
                year: Some(2025),
                value: Some(Decimal::from(1200)),
                entry_type: Some(EntryType::Expense),
                status: EntryStatus::Settled,
                ..entry_for(user_id)
            })
            .unwrap();

        let filters_and_wants = [
            (EntryFilter::default().description("Rent"), vec![rent.clone()]),
            (EntryFilter::default().description("Ren"), vec![]),
            (EntryFilter::default().month(1), vec![salary.clone()]),
            (EntryFilter::default().year(2025), vec![rent.clone()]),
            (
                EntryFilter::default().value(Decimal::new(300050, 2)),
                vec![salary.clone()],
            ),
            (
                EntryFilter::default().entry_type(EntryType::Expense),
                vec![rent.clone()],
            ),
            (
                EntryFilter::default().status(EntryStatus::Pending),
                vec![salary.clone()],
            ),
            (
                EntryFilter::default().user_id(user_id),
                vec![salary.clone(), rent.clone()],
            ),
            (EntryFilter::default().user_id(UserId::new(42)), vec![]),
            (
                EntryFilter {
                    id: rent.id,
                    ..Default::default()
                },
                vec![rent.clone()],
            ),
            (
                EntryFilter::default().month(1).entry_type(EntryType::Expense),
                vec![],
            ),
        ];

        for (filter, want) in filters_and_wants {
            let got = store.query(&filter).unwrap();

            assert_eq!(got, want, "unexpected entries for {filter:?}");
        }
    }

    #[test]
    fn query_matches_values_with_different_scale() {
        let (mut store, user_id) = get_store_and_user();
        let entry = store
            .create(&Entry {
                value: Some(Decimal::new(10050, 2)),
                ..entry_for(user_id)
            })
            .unwrap();

        let got = store
            .query(&EntryFilter::default().value(Decimal::new(1005, 1)))
            .unwrap();

        assert_eq!(got, vec![entry]);
    }

    #[test]
    fn stored_value_drops_trailing_zeros() {
        let (mut store, user_id) = get_store_and_user();
        let entry = Entry {
            value: Some(Decimal::new(10050, 2)),
            ..entry_for(user_id)
        };

        let created = store.create(&entry).unwrap();
        let got = store.get(created.id.unwrap()).unwrap();

        assert_eq!(created.value, entry.value);
        assert_eq!(got.value.unwrap().to_string(), "100.5");
    }

    #[test]
    fn sum_value_adds_entries_of_one_type_and_user() {
        let (mut store, user_id) = get_store_and_user();
        for value in [Decimal::new(1010, 2), Decimal::new(2020, 2)] {
            store
                .create(&Entry {
                    value: Some(value),
                    ..entry_for(user_id)
                })
                .unwrap();
        }
        store
            .create(&Entry {
                entry_type: Some(EntryType::Expense),
                ..entry_for(user_id)
            })
            .unwrap();

        let sum = store.sum_value_by_user_and_type(user_id, EntryType::Income);

        assert_eq!(sum, Ok(Some(Decimal::new(3030, 2))));
    }

    #[test]
    fn sum_value_fails_on_overflow() {
        let (mut store, user_id) = get_store_and_user();
        for _ in 0..2 {
            store
                .create(&Entry {
                    value: Some(Decimal::MAX),
                    ..entry_for(user_id)
                })
                .unwrap();
        }

        let sum = store.sum_value_by_user_and_type(user_id, EntryType::Income);

        assert_eq!(sum, Err(Error::BalanceOverflow));
    }

    #[test]
    fn sum_value_is_none_without_entries() {
        let (mut store, user_id) = get_store_and_user();
        store.create(&entry_for(user_id)).unwrap();

        let sum = store.sum_value_by_user_and_type(user_id, EntryType::Expense);

        assert_eq!(sum, Ok(None));
    }
}
