//! Family lock derived from the locks on the family's member documents.
//!
//! A family document is considered locked while any of its members' patient
//! records is checked out for editing. Members are scanned in repository
//! order and the first locked member wins, whatever the lock timestamps.

use tracing::{debug, error};

use super::{describe_lock, LockModule};
use crate::models::{DocumentLock, DocumentReference};
use crate::store::{DocumentStore, FamilyRepository, LockStore, StoreResult, UserResolver};

/// Fixed slot of the family-member module in the lock chain.
pub const FAMILY_MEMBERS_LOCK_PRIORITY: i32 = 300;

/// Reports a family as locked when one of its members is locked.
pub struct FamilyMembersLockModule<'a> {
    documents: &'a dyn DocumentStore,
    families: &'a dyn FamilyRepository,
    locks: &'a dyn LockStore,
    users: &'a dyn UserResolver,
}

impl<'a> FamilyMembersLockModule<'a> {
    pub fn new(
        documents: &'a dyn DocumentStore,
        families: &'a dyn FamilyRepository,
        locks: &'a dyn LockStore,
        users: &'a dyn UserResolver,
    ) -> Self {
        Self {
            documents,
            families,
            locks,
            users,
        }
    }

    /// Use one store for every collaborator.
    pub fn from_store<S>(store: &'a S) -> Self
    where
        S: DocumentStore + FamilyRepository + LockStore + UserResolver,
    {
        Self::new(store, store, store, store)
    }

    /// Scan the members of the family behind `reference`.
    fn find_member_lock(&self, reference: &DocumentReference) -> StoreResult<Option<DocumentLock>> {
        let document = self.documents.get_document(reference)?;
        let family_id = document.reference().name();

        let Some(family) = self.families.get_family_by_id(family_id)? else {
            debug!(family_id, "No family behind document");
            return Ok(None);
        };

        for member in family.members() {
            if let Some(lock) = self.locks.get_lock(member.document())? {
                debug!(family_id, member = %member.id, "Family member is locked");
                return describe_lock(self.users, &lock).map(Some);
            }
        }

        Ok(None)
    }
}

impl LockModule for FamilyMembersLockModule<'_> {
    fn name(&self) -> &'static str {
        "family-members"
    }

    fn priority(&self) -> i32 {
        FAMILY_MEMBERS_LOCK_PRIORITY
    }

    fn get_lock(&self, reference: Option<&DocumentReference>) -> Option<DocumentLock> {
        let reference = reference?;

        // Fail open: an unreadable document means "cannot tell", not "locked".
        match self.find_member_lock(reference) {
            Ok(lock) => lock,
            Err(e) => {
                error!(
                    document = %reference,
                    error = %e,
                    "Failed to read family document while checking member locks"
                );
                None
            }
        }
    }
}
