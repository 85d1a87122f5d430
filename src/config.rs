//! The settings the application is started with.

use std::path::{Path, PathBuf};

use crate::Error;

/// The range of bcrypt costs that bcrypt accepts.
const VALID_PASSWORD_COSTS: std::ops::RangeInclusive<u32> = 4..=31;

/// Where the application keeps its data and how it hashes passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    db_path: PathBuf,
    password_cost: u32,
}

impl Config {
    /// Create a validated config.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidConfig] if `db_path` has no file extension,
    /// e.g. `finance` instead of `finance.db`, or if `password_cost` is not a
    /// valid bcrypt cost.
    pub fn new(db_path: impl Into<PathBuf>, password_cost: u32) -> Result<Self, Error> {
        let db_path = db_path.into();

        if db_path.extension().is_none_or(|extension| extension.is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "database path must include a file extension (e.g., 'finance.db'), got {db_path:?}"
            )));
        }

        if !VALID_PASSWORD_COSTS.contains(&password_cost) {
            return Err(Error::InvalidConfig(format!(
                "password cost must be between {} and {}, got {password_cost}",
                VALID_PASSWORD_COSTS.start(),
                VALID_PASSWORD_COSTS.end()
            )));
        }

        Ok(Self {
            db_path,
            password_cost,
        })
    }

    /// File path to the application SQLite database.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// The bcrypt cost for hashing passwords.
    pub fn password_cost(&self) -> u32 {
        self.password_cost
    }
}
