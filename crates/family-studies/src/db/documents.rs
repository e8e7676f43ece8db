//! Document database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{format_timestamp, parse_timestamp, reference_from_columns, Database};
use crate::models::{Document, DocumentReference};
use crate::store::{DocumentStore, StoreError, StoreResult};

impl Database {
    /// Insert a document. Existing documents are left untouched.
    pub fn insert_document(&self, document: &Document) -> StoreResult<()> {
        insert_document_row(&self.conn, &document.reference, &document.created_at)
    }

    /// Get a document, if stored.
    pub fn find_document(&self, reference: &DocumentReference) -> StoreResult<Option<Document>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT wiki, space, name, created_at
                FROM documents
                WHERE wiki = ?1 AND space = ?2 AND name = ?3
                "#,
                params![reference.wiki, reference.space, reference.name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(wiki, space, name, created_at)| {
            Ok(Document {
                reference: reference_from_columns(wiki, space, name),
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .transpose()
    }

    /// Delete a document and its lock.
    pub fn delete_document(&self, reference: &DocumentReference) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM documents WHERE wiki = ?1 AND space = ?2 AND name = ?3",
            params![reference.wiki, reference.space, reference.name],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Shared with the patient and family inserts, which run in a transaction.
pub(super) fn insert_document_row(
    conn: &Connection,
    reference: &DocumentReference,
    created_at: &DateTime<Utc>,
) -> StoreResult<()> {
    conn.execute(
        r#"
        INSERT OR IGNORE INTO documents (wiki, space, name, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            reference.wiki,
            reference.space,
            reference.name,
            format_timestamp(created_at),
        ],
    )?;
    Ok(())
}

impl DocumentStore for Database {
    fn get_document(&self, reference: &DocumentReference) -> StoreResult<Document> {
        self.find_document(reference)?
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))
    }
}
