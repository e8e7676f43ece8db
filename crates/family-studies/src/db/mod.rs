//! SQLite-backed implementation of the collaborator traits.

mod documents;
mod families;
mod locks;
mod patients;
mod schema;
mod users;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

use crate::models::DocumentReference;
use crate::store::{StoreError, StoreResult};

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        debug!(path = %path.as_ref().display(), "Opening database");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {:?}: {}", raw, e)))
}

fn reference_from_columns(wiki: String, space: String, name: String) -> DocumentReference {
    DocumentReference { wiki, space, name }
}
