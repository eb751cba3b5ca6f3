//! Embedded LDP store bootstrap.
//!
//! # Responsibility
//! - Hand out SQLite connections ready to back `SqliteResourceStore`:
//!   foreign keys on (statement rows cascade with their resource) and the
//!   resource/statement schema migrated.
//! - Classify bootstrap failures with stable codes for `event=db_open` logs.
//!
//! # Invariants
//! - The store schema version lives in `PRAGMA user_version`.
//! - A connection is never returned with a partially migrated schema.
//! - A schema written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Store bootstrap and SQL transport failures.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// One migration script failed; the whole pending batch was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a store schema newer than this build knows.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Stable code used as `error_code=` in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite",
            Self::Migration { .. } => "db_migration_failed",
            Self::SchemaTooNew { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "store sql error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "store migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store schema version {found} was written by a newer build (supported up to {supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(source) | Self::Migration { source, .. } => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
