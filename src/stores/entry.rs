//! Defines the entry store trait.

use rust_decimal::Decimal;

use crate::{Entry, EntryFilter, EntryId, EntryType, Error, UserId};

/// Handles the creation, retrieval and removal of entries.
///
/// Stores do not validate entries, that is the job of
/// [EntryManager](crate::EntryManager).
pub trait EntryStore {
    /// Create a new entry in the store and return it with its assigned ID.
    ///
    /// Any ID already set on `entry` is ignored.
    fn create(&mut self, entry: &Entry) -> Result<Entry, Error>;

    /// Replace the stored entry that has `id` with the fields of `entry`.
    ///
    /// Returns [Error::UpdateMissingEntry] if there is no entry with `id`.
    fn update(&mut self, id: EntryId, entry: &Entry) -> Result<Entry, Error>;

    /// Remove the entry that has `id`.
    ///
    /// Returns [Error::DeleteMissingEntry] if there is no entry with `id`.
    fn delete(&mut self, id: EntryId) -> Result<(), Error>;

    /// Retrieve an entry from the store.
    ///
    /// Returns [Error::NotFound] if there is no entry with `id`.
    fn get(&self, id: EntryId) -> Result<Entry, Error>;

    /// Retrieve the entries that match every field set in `filter`.
    fn query(&self, filter: &EntryFilter) -> Result<Vec<Entry>, Error>;

    /// Sum the values of the entries of `entry_type` that belong to `user_id`.
    ///
    /// Returns `None` when the user has no entries of that type.
    fn sum_value_by_user_and_type(
        &self,
        user_id: UserId,
        entry_type: EntryType,
    ) -> Result<Option<Decimal>, Error>;
}
