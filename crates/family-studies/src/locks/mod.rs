//! Lock modules: strategies answering "is this document locked, and by whom".
//!
//! Modules are tried in ascending priority order by [`LockModuleChain`]; the
//! first one reporting a lock wins.

mod document;
mod family_members;

pub use document::*;
pub use family_members::*;

use tracing::{debug, warn};

use crate::models::{DocumentLock, DocumentReference, LockResult, StoredLock};
use crate::store::{DocumentStore, FamilyRepository, LockStore, StoreResult, UserResolver};

/// A lock-determination strategy.
pub trait LockModule {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Position in the chain. Lower runs first.
    fn priority(&self) -> i32;

    /// The lock applying to `reference`, if this module can determine one.
    fn get_lock(&self, reference: Option<&DocumentReference>) -> Option<DocumentLock>;
}

/// Explicitly built, priority-ordered list of lock modules.
pub struct LockModuleChain<'a> {
    modules: Vec<Box<dyn LockModule + 'a>>,
}

impl<'a> LockModuleChain<'a> {
    /// Build a chain. Modules with equal priority keep their given order.
    pub fn new(mut modules: Vec<Box<dyn LockModule + 'a>>) -> Self {
        modules.sort_by_key(|m| m.priority());
        Self { modules }
    }

    /// The document and family-member modules over one backing store.
    pub fn standard<S>(store: &'a S) -> Self
    where
        S: DocumentStore + FamilyRepository + LockStore + UserResolver,
    {
        let modules: Vec<Box<dyn LockModule + 'a>> = vec![
            Box::new(DocumentLockModule::from_store(store)),
            Box::new(FamilyMembersLockModule::from_store(store)),
        ];
        Self::new(modules)
    }

    /// Modules in the order they are consulted.
    pub fn modules(&self) -> impl Iterator<Item = &(dyn LockModule + 'a)> + '_ {
        self.modules.iter().map(|m| m.as_ref())
    }

    /// First lock reported by any module.
    pub fn get_lock(&self, reference: Option<&DocumentReference>) -> Option<DocumentLock> {
        let reference = reference?;
        self.modules.iter().find_map(|module| {
            let lock = module.get_lock(Some(reference));
            if let Some(lock) = &lock {
                debug!(
                    module = module.name(),
                    document = %reference,
                    holder = %lock.holder_key,
                    "Lock found"
                );
            }
            lock
        })
    }

    /// Same as [`Self::get_lock`], as a [`LockResult`].
    pub fn lock_status(&self, reference: Option<&DocumentReference>) -> LockResult {
        self.get_lock(reference).into()
    }
}

/// Resolve the holder of a stored lock. Unknown keys are reported as-is.
pub(crate) fn describe_lock(
    users: &dyn UserResolver,
    lock: &StoredLock,
) -> StoreResult<DocumentLock> {
    match users.get_user(&lock.user_key)? {
        Some(user) => Ok(DocumentLock::held_by(&user, lock)),
        None => {
            warn!(user = %lock.user_key, "Lock holder is not a known user");
            Ok(DocumentLock {
                holder_key: lock.user_key.clone(),
                holder_display_name: lock.user_key.clone(),
                acquired_at: lock.acquired_at,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct FixedModule {
        name: &'static str,
        priority: i32,
        holder: Option<&'static str>,
    }

    impl LockModule for FixedModule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn get_lock(&self, reference: Option<&DocumentReference>) -> Option<DocumentLock> {
            reference?;
            self.holder.map(|holder| DocumentLock {
                holder_key: holder.into(),
                holder_display_name: holder.into(),
                acquired_at: Utc::now(),
            })
        }
    }

    fn module(name: &'static str, priority: i32, holder: Option<&'static str>) -> Box<dyn LockModule> {
        Box::new(FixedModule {
            name,
            priority,
            holder,
        })
    }

    #[test]
    fn test_chain_sorted_by_ascending_priority() {
        let chain = LockModuleChain::new(vec![
            module("late", 500, None),
            module("members", 300, None),
            module("early", 100, None),
        ]);

        let names: Vec<_> = chain.modules().map(|m| m.name()).collect();
        assert_eq!(names, vec!["early", "members", "late"]);
    }

    #[test]
    fn test_equal_priorities_keep_insertion_order() {
        let chain = LockModuleChain::new(vec![module("a", 200, None), module("b", 200, None)]);
        let names: Vec<_> = chain.modules().map(|m| m.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_lowest_priority_lock_wins() {
        let chain = LockModuleChain::new(vec![
            module("late", 500, Some("late-holder")),
            module("early", 100, Some("early-holder")),
        ]);
        let reference = DocumentReference::new("xwiki", "Families", "F01");

        let lock = chain.get_lock(Some(&reference)).unwrap();
        assert_eq!(lock.holder_key, "early-holder");
    }

    #[test]
    fn test_falls_through_to_later_module() {
        let chain = LockModuleChain::new(vec![
            module("early", 100, None),
            module("late", 500, Some("late-holder")),
        ]);
        let reference = DocumentReference::new("xwiki", "Families", "F01");

        let status = chain.lock_status(Some(&reference));
        assert!(status.is_locked());
    }

    #[test]
    fn test_no_reference_no_lock() {
        let chain = LockModuleChain::new(vec![module("early", 100, Some("holder"))]);
        assert!(chain.get_lock(None).is_none());
        assert_eq!(chain.lock_status(None), LockResult::Unlocked);
    }
}
