//! Resource store contract consumed by the record lifecycle.
//!
//! # Responsibility
//! - Define blocking get/create/update/delete over LDP resources.
//! - Report semantic failures (`NotFound`, `Conflict`) apart from transport
//!   errors.
//!
//! # Invariants
//! - Every returned `Resource` carries a cached response with the current
//!   ETag.
//! - `update` with an ETag never overwrites a resource whose current ETag
//!   differs.

use crate::db::DbError;
use crate::model::resource::Resource;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    /// Conditional update rejected: the held ETag is stale.
    Conflict {
        uri: String,
        expected: String,
        actual: String,
    },
    AlreadyExists(String),
    InvalidData(String),
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(uri) => write!(f, "resource not found: {uri}"),
            Self::Conflict {
                uri,
                expected,
                actual,
            } => write!(
                f,
                "precondition failed for {uri}: expected etag {expected}, current etag {actual}"
            ),
            Self::AlreadyExists(uri) => write!(f, "resource already exists: {uri}"),
            Self::InvalidData(message) => write!(f, "invalid resource data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Blocking access to an LDP resource store.
pub trait ResourceStore {
    /// Fetches the current representation at `uri`.
    fn get(&self, uri: &str) -> StoreResult<Resource>;

    /// Creates `resource`. A resource without a subject is minted beneath
    /// its container.
    fn create(&self, resource: &Resource) -> StoreResult<Resource>;

    /// Replaces the statements of an existing resource. With `etag`, the
    /// write only succeeds when it matches the current ETag.
    fn update(&self, resource: &Resource, etag: Option<&str>) -> StoreResult<Resource>;

    /// Removes the resource at `uri` and everything beneath it.
    fn delete(&self, uri: &str) -> StoreResult<()>;
}

impl<T: ResourceStore + ?Sized> ResourceStore for &T {
    fn get(&self, uri: &str) -> StoreResult<Resource> {
        (**self).get(uri)
    }

    fn create(&self, resource: &Resource) -> StoreResult<Resource> {
        (**self).create(resource)
    }

    fn update(&self, resource: &Resource, etag: Option<&str>) -> StoreResult<Resource> {
        (**self).update(resource, etag)
    }

    fn delete(&self, uri: &str) -> StoreResult<()> {
        (**self).delete(uri)
    }
}
