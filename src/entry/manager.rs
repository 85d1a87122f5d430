//! Creates, changes and searches entries, enforcing the rules for entries.

use rust_decimal::Decimal;

use crate::{
    BusinessRuleError, Entry, EntryFilter, EntryId, EntryStatus, EntryType, Error, UserId,
    entry::validate_entry, stores::EntryStore,
};

/// The business logic for entries.
///
/// Every entry is validated with [validate_entry] before it reaches the store.
#[derive(Debug, Clone)]
pub struct EntryManager<S: EntryStore> {
    store: S,
}

impl<S: EntryStore> EntryManager<S> {
    /// Create a manager that persists entries in `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and store a new entry.
    ///
    /// The entry is stored with whatever status it has, see [Entry::build]
    /// for the default.
    ///
    /// # Errors
    ///
    /// Returns an [Error::BusinessRule] if the entry is invalid, in which case
    /// nothing is stored, or any error from the store.
    pub fn save(&mut self, entry: Entry) -> Result<Entry, Error> {
        self.validate(&entry)?;

        let entry = self.store.create(&entry)?;
        tracing::info!("Saved entry {:?} for user {:?}", entry.id, entry.user_id);

        Ok(entry)
    }

    /// Validate and store the changes to an entry that was saved before.
    ///
    /// # Panics
    ///
    /// Panics if `entry` has no ID, i.e., it was never saved. The store is not
    /// touched in that case.
    ///
    /// # Errors
    ///
    /// Returns an [Error::BusinessRule] if the entry is invalid,
    /// [Error::UpdateMissingEntry] if the entry is no longer stored, or any
    /// other error from the store.
    pub fn update(&mut self, entry: Entry) -> Result<Entry, Error> {
        let id = require_saved(&entry, "update");
        self.validate(&entry)?;

        let entry = self.store.update(id, &entry)?;
        tracing::info!("Updated entry {id}");

        Ok(entry)
    }

    /// Remove an entry that was saved before.
    ///
    /// # Panics
    ///
    /// Panics if `entry` has no ID, i.e., it was never saved. The store is not
    /// touched in that case.
    ///
    /// # Errors
    ///
    /// Returns [Error::DeleteMissingEntry] if the entry is no longer stored,
    /// or any other error from the store.
    pub fn delete(&mut self, entry: &Entry) -> Result<(), Error> {
        let id = require_saved(entry, "delete");

        self.store.delete(id)?;
        tracing::info!("Deleted entry {id}");

        Ok(())
    }

    /// Find the entries that match `filter`, in the order the store returns them.
    ///
    /// # Errors
    ///
    /// Returns any error from the store.
    pub fn find(&self, filter: &EntryFilter) -> Result<Vec<Entry>, Error> {
        let entries = self.store.query(filter)?;
        tracing::debug!("Found {} entries for {filter:?}", entries.len());

        Ok(entries)
    }

    /// Move a saved entry to `status` and store the change.
    ///
    /// The returned entry is `entry` with the new status, as stored.
    ///
    /// # Panics
    ///
    /// Panics if `entry` has no ID, see [EntryManager::update].
    ///
    /// # Errors
    ///
    /// Returns the same errors as [EntryManager::update].
    pub fn update_status(&mut self, entry: Entry, status: EntryStatus) -> Result<Entry, Error> {
        tracing::info!(
            "Changing status of entry {:?} from {} to {status}",
            entry.id,
            entry.status
        );

        self.update(entry.with_status(status))
    }

    /// Get the entry with `id`, or `None` if there is no such entry.
    ///
    /// # Errors
    ///
    /// Returns any error from the store other than [Error::NotFound].
    pub fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>, Error> {
        match self.store.get(id) {
            Ok(entry) => Ok(Some(entry)),
            Err(Error::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Check `entry` against the business rules, see [validate_entry].
    ///
    /// # Errors
    ///
    /// Returns the [BusinessRuleError] for the first rule that `entry` breaks.
    pub fn validate(&self, entry: &Entry) -> Result<(), BusinessRuleError> {
        validate_entry(entry).inspect_err(|violation| {
            tracing::debug!("Rejected entry {:?}: {violation}", entry.id);
        })
    }

    /// The balance of a user: the total of their income minus the total of
    /// their expenses.
    ///
    /// Entries of every status are counted. A user without any entries of a
    /// type contributes zero for that type.
    ///
    /// # Errors
    ///
    /// Returns an [Error::BalanceOverflow] if a total or the balance is too
    /// large for a [Decimal], or any other error from the store.
    pub fn balance_by_user(&self, user_id: UserId) -> Result<Decimal, Error> {
        let income = self
            .store
            .sum_value_by_user_and_type(user_id, EntryType::Income)?
            .unwrap_or(Decimal::ZERO);
        let expenses = self
            .store
            .sum_value_by_user_and_type(user_id, EntryType::Expense)?
            .unwrap_or(Decimal::ZERO);

        income.checked_sub(expenses).ok_or(Error::BalanceOverflow)
    }
}

/// Get the ID of an entry that must already be stored.
///
/// # Panics
///
/// Panics if `entry` has no ID.
fn require_saved(entry: &Entry, operation: &str) -> EntryId {
    match entry.id {
        Some(id) => id,
        None => panic!("cannot {operation} an entry that has not been saved: the entry has no ID"),
    }
}
