//! Defines the core data model for entries.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Alias for the integer type used for entry IDs.
pub type EntryId = i64;

/// Whether an entry is money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. rent.
    Expense,
}

impl EntryType {
    /// The canonical text form used for storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "INCOME",
            EntryType::Expense => "EXPENSE",
        }
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text did not name an [EntryType].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("\"{0}\" is not an entry type, expected INCOME or EXPENSE")]
pub struct ParseEntryTypeError(pub String);

impl FromStr for EntryType {
    type Err = ParseEntryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(EntryType::Income),
            "EXPENSE" => Ok(EntryType::Expense),
            _ => Err(ParseEntryTypeError(s.to_owned())),
        }
    }
}

/// Where an entry is in its life cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// The money has not moved yet.
    #[default]
    Pending,
    /// The money has moved.
    Settled,
    /// The entry was called off.
    Canceled,
}

impl EntryStatus {
    /// The canonical text form used for storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "PENDING",
            EntryStatus::Settled => "SETTLED",
            EntryStatus::Canceled => "CANCELED",
        }
    }
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text did not name an [EntryStatus].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("\"{0}\" is not an entry status, expected PENDING, SETTLED or CANCELED")]
pub struct ParseEntryStatusError(pub String);

impl FromStr for EntryStatus {
    type Err = ParseEntryStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(EntryStatus::Pending),
            "SETTLED" => Ok(EntryStatus::Settled),
            "CANCELED" => Ok(EntryStatus::Canceled),
            _ => Err(ParseEntryStatusError(s.to_owned())),
        }
    }
}

/// A single income or expense of a user.
///
/// Fields are optional because an entry may come straight from user input,
/// [validate_entry](crate::validate_entry) decides whether it can be stored.
/// An entry that has not been saved yet has no `id`.
///
/// To create a new `Entry`, use [Entry::build].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The ID assigned by the store, `None` until the entry is saved.
    pub id: Option<EntryId>,
    /// A text description of what the entry was for.
    pub description: Option<String>,
    /// The month of the entry, 1 for January through to 12 for December.
    pub month: Option<i32>,
    /// The year of the entry.
    pub year: Option<i32>,
    /// The amount of money earned or spent, always positive.
    ///
    /// Stores keep the value without trailing zeros, so an entry saved with
    /// `100.50` is returned with `100.5`. The two compare equal.
    pub value: Option<Decimal>,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    /// Where the entry is in its life cycle.
    pub status: EntryStatus,
    /// The user the entry belongs to.
    pub user_id: Option<UserId>,
}

impl Entry {
    /// Create a new entry.
    ///
    /// Shortcut for [EntryBuilder] for discoverability.
    pub fn build(description: &str, value: Decimal, entry_type: EntryType) -> EntryBuilder {
        EntryBuilder {
            description: description.to_owned(),
            value,
            entry_type,
            month: None,
            year: None,
            user_id: None,
            status: EntryStatus::Pending,
        }
    }

    /// Return a copy of the entry with its status set to `status`.
    pub fn with_status(self, status: EntryStatus) -> Self {
        Self { status, ..self }
    }
}

/// A builder for creating [Entry] instances.
///
/// The status defaults to [EntryStatus::Pending]. The period and user are
/// left unset until given, in which case the built entry will not pass
/// validation.
///
/// # Examples
///
/// ```
/// use finance_tracker::{Entry, EntryType, UserId};
/// use rust_decimal::Decimal;
///
/// let entry = Entry::build("Salary", Decimal::new(500000, 2), EntryType::Income)
///     .month(1)
///     .year(2025)
///     .user_id(UserId::new(1))
///     .finalize();
///
/// assert_eq!(entry.id, None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EntryBuilder {
    /// A text description of what the entry was for.
    pub description: String,
    /// The amount of money earned or spent.
    pub value: Decimal,
    /// Whether the money was earned or spent.
    pub entry_type: EntryType,
    /// The month of the entry.
    pub month: Option<i32>,
    /// The year of the entry.
    pub year: Option<i32>,
    /// The user the entry belongs to.
    pub user_id: Option<UserId>,
    /// The initial status of the entry.
    pub status: EntryStatus,
}

impl EntryBuilder {
    /// Set the month of the entry.
    pub fn month(mut self, month: i32) -> Self {
        self.month = Some(month);
        self
    }

    /// Set the year of the entry.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the user the entry belongs to.
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the initial status of the entry.
    pub fn status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    /// Create the unsaved [Entry].
    pub fn finalize(self) -> Entry {
        Entry {
            id: None,
            description: Some(self.description),
            month: self.month,
            year: self.year,
            value: Some(self.value),
            entry_type: Some(self.entry_type),
            status: self.status,
            user_id: self.user_id,
        }
    }
}

#[cfg(test)]
mod entry_type_tests {
    use std::str::FromStr;

    use crate::{EntryType, ParseEntryTypeError};

    #[test]
    fn parses_canonical_names() {
        assert_eq!(EntryType::from_str("INCOME"), Ok(EntryType::Income));
        assert_eq!(EntryType::from_str("EXPENSE"), Ok(EntryType::Expense));
    }

    #[test]
    fn parses_ignoring_case() {
        assert_eq!(EntryType::from_str("income"), Ok(EntryType::Income));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            EntryType::from_str("transfer"),
            Err(ParseEntryTypeError("transfer".to_owned()))
        );
    }

    #[test]
    fn displays_canonical_name() {
        assert_eq!(EntryType::Expense.to_string(), "EXPENSE");
    }
}
