//! Contains traits and implementations for objects that store the domain models.
//!
//! The managers only talk to storage through [UserStore] and [EntryStore], the
//! [sqlite] module implements both on top of a shared SQLite connection.

mod entry;
mod user;

pub mod sqlite;

pub use entry::EntryStore;
pub use user::UserStore;
