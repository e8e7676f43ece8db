//! Collaborator interfaces consumed by the lock modules.
//!
//! The lock modules only read through these traits. [`crate::db::Database`]
//! implements all of them on SQLite; hosts embedding the crate elsewhere
//! provide their own.

use thiserror::Error;

use crate::models::{Document, DocumentReference, Family, StoredLock, User};

/// Storage-layer faults.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Looks up families by identifier.
pub trait FamilyRepository {
    /// `Ok(None)` when no such family exists.
    fn get_family_by_id(&self, id: &str) -> StoreResult<Option<Family>>;
}

/// Resolves document references to documents.
pub trait DocumentStore {
    fn get_document(&self, reference: &DocumentReference) -> StoreResult<Document>;
}

/// Reads per-document editing locks.
pub trait LockStore {
    /// `Ok(None)` when the document is not checked out.
    fn get_lock(&self, reference: &DocumentReference) -> StoreResult<Option<StoredLock>>;
}

/// Maps raw user keys to identities.
pub trait UserResolver {
    /// `Ok(None)` when the key is unknown.
    fn get_user(&self, key: &str) -> StoreResult<Option<User>>;
}
