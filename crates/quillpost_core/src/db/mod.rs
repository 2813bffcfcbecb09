//! Draft store database.
//!
//! The store is a single SQLite file (or an in-memory database in tests)
//! holding the `draft_slots` table. Connections come out of [`open_db`]
//! fully migrated, so slot repositories can assume the table exists.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening or migrating the draft store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; its slots are left untouched.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "draft store error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "draft store schema {found} is newer than this build understands (up to {supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use std::error::Error;

    #[test]
    fn messages_name_the_draft_store() {
        let err = DbError::SchemaTooNew {
            found: 7,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "draft store schema 7 is newer than this build understands (up to 1)"
        );
        assert!(err.source().is_none());

        let err = DbError::from(rusqlite::Error::InvalidQuery);
        assert!(err.to_string().starts_with("draft store error: "));
        assert!(err.source().is_some());
    }
}
