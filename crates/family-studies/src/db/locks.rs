//! Document lock database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{format_timestamp, parse_timestamp, Database};
use crate::models::{DocumentReference, StoredLock};
use crate::store::{LockStore, StoreResult};

impl Database {
    /// Check a document out for `user_key`.
    ///
    /// Returns `false` if the document is already locked (by anyone).
    pub fn lock_document(
        &self,
        reference: &DocumentReference,
        user_key: &str,
        acquired_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            INSERT INTO document_locks (wiki, space, name, user_key, acquired_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (wiki, space, name) DO NOTHING
            "#,
            params![
                reference.wiki,
                reference.space,
                reference.name,
                user_key,
                format_timestamp(&acquired_at),
            ],
        )?;
        let acquired = rows_affected > 0;
        debug!(document = %reference, user = user_key, acquired, "Lock requested");
        Ok(acquired)
    }

    /// Release the lock on a document.
    pub fn unlock_document(&self, reference: &DocumentReference) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM document_locks WHERE wiki = ?1 AND space = ?2 AND name = ?3",
            params![reference.wiki, reference.space, reference.name],
        )?;
        Ok(rows_affected > 0)
    }

    /// Release every lock held by a user. Returns how many were released.
    pub fn release_user_locks(&self, user_key: &str) -> StoreResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM document_locks WHERE user_key = ?", [user_key])?)
    }
}

impl LockStore for Database {
    fn get_lock(&self, reference: &DocumentReference) -> StoreResult<Option<StoredLock>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT user_key, acquired_at
                FROM document_locks
                WHERE wiki = ?1 AND space = ?2 AND name = ?3
                "#,
                params![reference.wiki, reference.space, reference.name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        row.map(|(user_key, acquired_at)| {
            Ok(StoredLock {
                user_key,
                acquired_at: parse_timestamp(&acquired_at)?,
            })
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn setup_db() -> (Database, DocumentReference) {
        let db = Database::open_in_memory().unwrap();
        let reference = DocumentReference::new("xwiki", "data", "P0000001");
        db.insert_document(&Document::new(reference.clone())).unwrap();
        (db, reference)
    }

    #[test]
    fn test_lock_and_unlock() {
        let (db, reference) = setup_db();
        let now = Utc::now();

        assert!(db.get_lock(&reference).unwrap().is_none());
        assert!(db.lock_document(&reference, "XWiki.jdoe", now).unwrap());

        let lock = db.get_lock(&reference).unwrap().unwrap();
        assert_eq!(lock, StoredLock::new("XWiki.jdoe", now));

        assert!(db.unlock_document(&reference).unwrap());
        assert!(db.get_lock(&reference).unwrap().is_none());
        assert!(!db.unlock_document(&reference).unwrap());
    }

    #[test]
    fn test_single_lock_per_document() {
        let (db, reference) = setup_db();

        assert!(db.lock_document(&reference, "XWiki.jdoe", Utc::now()).unwrap());
        assert!(!db.lock_document(&reference, "XWiki.other", Utc::now()).unwrap());

        let lock = db.get_lock(&reference).unwrap().unwrap();
        assert_eq!(lock.user_key, "XWiki.jdoe");
    }

    #[test]
    fn test_lock_requires_document() {
        let db = Database::open_in_memory().unwrap();
        let reference = DocumentReference::new("xwiki", "data", "missing");

        assert!(db.lock_document(&reference, "XWiki.jdoe", Utc::now()).is_err());
    }

    #[test]
    fn test_release_user_locks() {
        let (db, first) = setup_db();
        let second = DocumentReference::new("xwiki", "data", "P0000002");
        db.insert_document(&Document::new(second.clone())).unwrap();

        db.lock_document(&first, "XWiki.jdoe", Utc::now()).unwrap();
        db.lock_document(&second, "XWiki.jdoe", Utc::now()).unwrap();

        assert_eq!(db.release_user_locks("XWiki.jdoe").unwrap(), 2);
        assert!(db.get_lock(&first).unwrap().is_none());
    }
}
