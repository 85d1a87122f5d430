//! Financial entries for the tracker.
//!
//! This module contains everything related to entries:
//! - The `Entry` model and `EntryBuilder` for creating entries
//! - The rules an entry must satisfy before it is stored
//! - The `EntryFilter` used to search for entries
//! - The `EntryManager` that ties the rules to an [EntryStore](crate::stores::EntryStore)

mod core;
mod filter;
mod manager;
mod validation;

pub use self::core::{
    Entry, EntryBuilder, EntryId, EntryStatus, EntryType, ParseEntryStatusError,
    ParseEntryTypeError,
};
pub use filter::EntryFilter;
pub use manager::EntryManager;
pub use validation::validate_entry;
