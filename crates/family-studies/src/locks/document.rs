//! Lock held directly on the queried document.

use tracing::error;

use super::{describe_lock, LockModule};
use crate::models::{DocumentLock, DocumentReference};
use crate::store::{LockStore, UserResolver};

/// Runs before the family-member module.
pub const DOCUMENT_LOCK_PRIORITY: i32 = 100;

/// Reports the lock on the document itself.
pub struct DocumentLockModule<'a> {
    locks: &'a dyn LockStore,
    users: &'a dyn UserResolver,
}

impl<'a> DocumentLockModule<'a> {
    pub fn new(locks: &'a dyn LockStore, users: &'a dyn UserResolver) -> Self {
        Self { locks, users }
    }

    pub fn from_store<S>(store: &'a S) -> Self
    where
        S: LockStore + UserResolver,
    {
        Self::new(store, store)
    }
}

impl LockModule for DocumentLockModule<'_> {
    fn name(&self) -> &'static str {
        "document"
    }

    fn priority(&self) -> i32 {
        DOCUMENT_LOCK_PRIORITY
    }

    fn get_lock(&self, reference: Option<&DocumentReference>) -> Option<DocumentLock> {
        let reference = reference?;
        let result = self
            .locks
            .get_lock(reference)
            .and_then(|lock| lock.map(|l| describe_lock(self.users, &l)).transpose());

        match result {
            Ok(lock) => lock,
            Err(e) => {
                error!(document = %reference, error = %e, "Failed to read document lock");
                None
            }
        }
    }
}
