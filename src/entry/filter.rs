//! Defines how entries are searched for.

use rust_decimal::Decimal;

use crate::{Entry, EntryId, EntryStatus, EntryType, UserId};

/// Selects the entries that match every field that is set.
///
/// Fields left as `None` are ignored, so the default filter matches every
/// entry. Fields that are set must match exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    /// Only include the entry with this ID.
    pub id: Option<EntryId>,
    /// Only include entries with exactly this description.
    pub description: Option<String>,
    /// Only include entries for this month.
    pub month: Option<i32>,
    /// Only include entries for this year.
    pub year: Option<i32>,
    /// Only include entries with this value.
    pub value: Option<Decimal>,
    /// Only include entries of this type.
    pub entry_type: Option<EntryType>,
    /// Only include entries with this status.
    pub status: Option<EntryStatus>,
    /// Only include entries that belong to this user.
    pub user_id: Option<UserId>,
}

impl EntryFilter {
    /// Only include entries with exactly `description`.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Only include entries for `month`.
    pub fn month(mut self, month: i32) -> Self {
        self.month = Some(month);
        self
    }

    /// Only include entries for `year`.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Only include entries with `value`.
    pub fn value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    /// Only include entries of `entry_type`.
    pub fn entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    /// Only include entries with `status`.
    pub fn status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only include entries that belong to `user_id`.
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Use an entry as an example of the entries to find.
///
/// Every field that is set on the entry is matched, including the status,
/// which is always set.
impl From<&Entry> for EntryFilter {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            description: entry.description.clone(),
            month: entry.month,
            year: entry.year,
            value: entry.value,
            entry_type: entry.entry_type,
            status: Some(entry.status),
            user_id: entry.user_id,
        }
    }
}

#[cfg(test)]
mod entry_filter_tests {
    use rust_decimal::Decimal;

    use crate::{Entry, EntryFilter, EntryStatus, EntryType, UserId};

    #[test]
    fn default_filter_sets_nothing() {
        let filter = EntryFilter::default();

        assert_eq!(filter.id, None);
        assert_eq!(filter.description, None);
        assert_eq!(filter.status, None);
        assert_eq!(filter.user_id, None);
    }

    #[test]
    fn from_entry_copies_present_fields() {
        let entry = Entry::build("Groceries", Decimal::new(4550, 2), EntryType::Expense)
            .month(5)
            .user_id(UserId::new(3))
            .finalize();

        let filter = EntryFilter::from(&entry);

        assert_eq!(
            filter,
            EntryFilter::default()
                .description("Groceries")
                .value(Decimal::new(4550, 2))
                .entry_type(EntryType::Expense)
                .month(5)
                .user_id(UserId::new(3))
                .status(EntryStatus::Pending)
        );
    }
}
