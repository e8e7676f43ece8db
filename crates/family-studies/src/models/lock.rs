//! Editing lock models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Raw lock record as kept by the lock store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredLock {
    /// Raw user key of the holder, not a display name
    pub user_key: String,
    /// When the document was checked out
    pub acquired_at: DateTime<Utc>,
}

impl StoredLock {
    pub fn new(user_key: impl Into<String>, acquired_at: DateTime<Utc>) -> Self {
        Self {
            user_key: user_key.into(),
            acquired_at,
        }
    }
}

/// A lock reported to callers: who holds it and since when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentLock {
    /// Raw user key of the holder
    pub holder_key: String,
    /// Display name of the holder
    pub holder_display_name: String,
    /// When the lock was acquired
    pub acquired_at: DateTime<Utc>,
}

impl DocumentLock {
    /// Build from a stored lock and the resolved holder.
    pub fn held_by(user: &User, lock: &StoredLock) -> Self {
        Self {
            holder_key: user.key.clone(),
            holder_display_name: user.display_name.clone(),
            acquired_at: lock.acquired_at,
        }
    }
}

/// Outcome of a lock query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LockResult {
    Unlocked,
    LockedBy {
        holder_display_name: String,
        acquired_at: DateTime<Utc>,
    },
}

impl LockResult {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockResult::LockedBy { .. })
    }
}

impl From<Option<DocumentLock>> for LockResult {
    fn from(lock: Option<DocumentLock>) -> Self {
        match lock {
            Some(lock) => LockResult::LockedBy {
                holder_display_name: lock.holder_display_name,
                acquired_at: lock.acquired_at,
            },
            None => LockResult::Unlocked,
        }
    }
}
