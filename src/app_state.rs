//! Implements a struct that holds the state of the application.

use crate::{
    EntryManager, UserManager,
    stores::{EntryStore, UserStore},
};

/// The managers the application serves requests with.
#[derive(Debug, Clone)]
pub struct AppState<U, E>
where
    U: UserStore,
    E: EntryStore,
{
    /// Registers and authenticates users.
    pub users: UserManager<U>,

    /// Records, changes and searches entries.
    pub entries: EntryManager<E>,
}

impl<U, E> AppState<U, E>
where
    U: UserStore,
    E: EntryStore,
{
    /// Create a new [AppState] from the stores for each domain model.
    ///
    /// `password_cost` is the bcrypt cost for hashing the passwords of new users.
    pub fn new(user_store: U, entry_store: E, password_cost: u32) -> Self {
        Self {
            users: UserManager::new(user_store, password_cost),
            entries: EntryManager::new(entry_store),
        }
    }
}
