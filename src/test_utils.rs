#![allow(missing_docs)]

use std::{
    cell::RefCell,
    sync::{Arc, Mutex},
};

use rust_decimal::Decimal;
use rusqlite::Connection;

use crate::{
    Entry, EntryFilter, EntryId, EntryType, Error, UserId, db::initialize, stores::EntryStore,
};

/// Open an in-memory database with every table created.
pub(crate) fn get_test_connection() -> Arc<Mutex<Connection>> {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    Arc::new(Mutex::new(connection))
}

/// A call made to a [SpyEntryStore].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoreCall {
    Create,
    Update(EntryId),
    Delete(EntryId),
    Get(EntryId),
    Query(EntryFilter),
    Sum(UserId, EntryType),
}

/// An in-memory entry store that records every call made to it.
#[derive(Debug, Default)]
pub(crate) struct SpyEntryStore {
    calls: RefCell<Vec<StoreCall>>,
    pub entries: Vec<Entry>,
    next_id: EntryId,
}

impl SpyEntryStore {
    /// The calls made to the store so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls.borrow_mut().push(call);
    }

    fn matches(entry: &Entry, filter: &EntryFilter) -> bool {
        filter.id.is_none_or(|id| entry.id == Some(id))
            && filter
                .description
                .as_ref()
                .is_none_or(|description| entry.description.as_ref() == Some(description))
            && filter.month.is_none_or(|month| entry.month == Some(month))
            && filter.year.is_none_or(|year| entry.year == Some(year))
            && filter.value.is_none_or(|value| entry.value == Some(value))
            && filter
                .entry_type
                .is_none_or(|entry_type| entry.entry_type == Some(entry_type))
            && filter.status.is_none_or(|status| entry.status == status)
            && filter
                .user_id
                .is_none_or(|user_id| entry.user_id == Some(user_id))
    }
}

impl EntryStore for SpyEntryStore {
    fn create(&mut self, entry: &Entry) -> Result<Entry, Error> {
        self.record(StoreCall::Create);
        self.next_id += 1;

        let entry = Entry {
            id: Some(self.next_id),
            ..entry.clone()
        };
        self.entries.push(entry.clone());

        Ok(entry)
    }

    fn update(&mut self, id: EntryId, entry: &Entry) -> Result<Entry, Error> {
        self.record(StoreCall::Update(id));

        let stored = self
            .entries
            .iter_mut()
            .find(|stored| stored.id == Some(id))
            .ok_or(Error::UpdateMissingEntry)?;
        *stored = Entry {
            id: Some(id),
            ..entry.clone()
        };

        Ok(stored.clone())
    }

    fn delete(&mut self, id: EntryId) -> Result<(), Error> {
        self.record(StoreCall::Delete(id));

        let count_before = self.entries.len();
        self.entries.retain(|entry| entry.id != Some(id));

        if self.entries.len() == count_before {
            return Err(Error::DeleteMissingEntry);
        }

        Ok(())
    }

    fn get(&self, id: EntryId) -> Result<Entry, Error> {
        self.record(StoreCall::Get(id));

        self.entries
            .iter()
            .find(|entry| entry.id == Some(id))
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn query(&self, filter: &EntryFilter) -> Result<Vec<Entry>, Error> {
        self.record(StoreCall::Query(filter.clone()));

        Ok(self
            .entries
            .iter()
            .filter(|entry| Self::matches(entry, filter))
            .cloned()
            .collect())
    }

    fn sum_value_by_user_and_type(
        &self,
        user_id: UserId,
        entry_type: EntryType,
    ) -> Result<Option<Decimal>, Error> {
        self.record(StoreCall::Sum(user_id, entry_type));

        self.entries
            .iter()
            .filter(|entry| {
                entry.user_id == Some(user_id) && entry.entry_type == Some(entry_type)
            })
            .filter_map(|entry| entry.value)
            .try_fold(None, |total: Option<Decimal>, value| {
                total
                    .unwrap_or(Decimal::ZERO)
                    .checked_add(value)
                    .map(Some)
                    .ok_or(Error::BalanceOverflow)
            })
    }
}
