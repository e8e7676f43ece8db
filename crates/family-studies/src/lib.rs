//! Family Studies Core Library
//!
//! Answers "is this family record locked for editing, and by whom" for
//! pedigree records whose members are individual patient documents.
//!
//! # Architecture
//!
//! ```text
//!   family document reference
//!              │
//!   ┌──────────▼──────────┐   priority 100
//!   │ DocumentLockModule  │── lock on the family document itself?
//!   └──────────┬──────────┘
//!              │ none
//!   ┌──────────▼──────────────┐   priority 300
//!   │ FamilyMembersLockModule │── first locked member, in family order
//!   └──────────┬──────────────┘
//!              │
//!     DocumentLock { holder, acquired_at }  or  unlocked
//! ```
//!
//! Storage faults never escape a lock query: they are logged and the query
//! reports no lock.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Family, Patient, DocumentReference, locks)
//! - [`store`]: Collaborator traits the lock modules read through
//! - [`locks`]: Lock modules and the priority-ordered chain
//! - [`db`]: SQLite implementation of the collaborator traits
//! - [`config`] / [`logging`]: Runtime configuration and tracing setup

pub mod config;
pub mod db;
pub mod locks;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use locks::{
    DocumentLockModule, FamilyMembersLockModule, LockModule, LockModuleChain,
    DOCUMENT_LOCK_PRIORITY, FAMILY_MEMBERS_LOCK_PRIORITY,
};
pub use models::{
    Document, DocumentLock, DocumentReference, Family, LockResult, Patient, StoredLock, User,
};
pub use store::{StoreError, StoreResult};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FamilyStudiesError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StoreError> for FamilyStudiesError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => FamilyStudiesError::NotFound(what),
            other => FamilyStudiesError::DatabaseError(other.to_string()),
        }
    }
}

impl From<models::ReferenceError> for FamilyStudiesError {
    fn from(e: models::ReferenceError) -> Self {
        FamilyStudiesError::InvalidInput(e.to_string())
    }
}

impl From<anyhow::Error> for FamilyStudiesError {
    fn from(e: anyhow::Error) -> Self {
        FamilyStudiesError::ConfigError(format!("{:#}", e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for FamilyStudiesError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        FamilyStudiesError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<FamilyStudiesCore>, FamilyStudiesError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(FamilyStudiesCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<FamilyStudiesCore>, FamilyStudiesError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(FamilyStudiesCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Load configuration from the environment, install logging and open the
/// configured database.
#[uniffi::export]
pub fn open_from_environment() -> Result<Arc<FamilyStudiesCore>, FamilyStudiesError> {
    let cfg = config::FamilyStudiesConfig::load()?;
    logging::init_logging(&cfg.log_filter, cfg.log_format()?)?;
    open_database(cfg.database_path)
}

/// Install the tracing subscriber. `format` is "compact" or "json".
#[uniffi::export]
pub fn init_logging(filter: String, format: String) -> Result<bool, FamilyStudiesError> {
    let format: logging::LogFormat = format.parse()?;
    Ok(logging::init_logging(&filter, format)?)
}

/// Priority of the family-member lock module.
#[uniffi::export]
pub fn family_lock_priority() -> i32 {
    FAMILY_MEMBERS_LOCK_PRIORITY
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct FamilyStudiesCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl FamilyStudiesCore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Create a patient record.
    pub fn create_patient(
        &self,
        patient_id: Option<String>,
        external_id: Option<String>,
    ) -> Result<FfiPatient, FamilyStudiesError> {
        let db = self.db.lock()?;
        let mut patient = match patient_id {
            Some(id) if !id.trim().is_empty() => Patient::new(id),
            Some(_) => {
                return Err(FamilyStudiesError::InvalidInput(
                    "patient id must not be blank".into(),
                ))
            }
            None => Patient::generate(),
        };
        patient.external_id = external_id;
        db.insert_patient(&patient)?;
        Ok(patient.into())
    }

    /// Create an empty family.
    pub fn create_family(&self, family_id: String) -> Result<FfiFamily, FamilyStudiesError> {
        let db = self.db.lock()?;
        let family = Family::new(family_id);
        db.insert_family(&family)?;
        Ok(family.into())
    }

    /// Append a patient to a family.
    pub fn add_family_member(
        &self,
        family_id: String,
        patient_id: String,
    ) -> Result<FfiFamily, FamilyStudiesError> {
        let db = self.db.lock()?;
        db.get_patient(&patient_id)?
            .ok_or_else(|| FamilyStudiesError::NotFound(format!("patient {}", patient_id)))?;
        db.add_family_member(&family_id, &patient_id)?;
        let family = db
            .get_family(&family_id)?
            .ok_or_else(|| FamilyStudiesError::NotFound(format!("family {}", family_id)))?;
        Ok(family.into())
    }

    /// Get a family with its members.
    pub fn get_family(&self, family_id: String) -> Result<Option<FfiFamily>, FamilyStudiesError> {
        let db = self.db.lock()?;
        Ok(db.get_family(&family_id)?.map(Into::into))
    }

    /// Add a user or update its display name.
    pub fn register_user(&self, key: String, display_name: String) -> Result<(), FamilyStudiesError> {
        let db = self.db.lock()?;
        db.upsert_user(&User::new(key, display_name))?;
        Ok(())
    }

    // =========================================================================
    // Lock Operations
    // =========================================================================

    /// Check a document out for editing. Returns false if already locked.
    pub fn lock_document(
        &self,
        reference: String,
        user_key: String,
    ) -> Result<bool, FamilyStudiesError> {
        let reference: DocumentReference = reference.parse()?;
        let db = self.db.lock()?;
        Ok(db.lock_document(&reference, &user_key, Utc::now())?)
    }

    /// Release the lock on a document.
    pub fn unlock_document(&self, reference: String) -> Result<bool, FamilyStudiesError> {
        let reference: DocumentReference = reference.parse()?;
        let db = self.db.lock()?;
        Ok(db.unlock_document(&reference)?)
    }

    /// Lock applying to a family document, through the full module chain.
    ///
    /// `None` (no reference) and an unlocked family both give `None`.
    pub fn get_family_lock(
        &self,
        reference: Option<String>,
    ) -> Result<Option<FfiDocumentLock>, FamilyStudiesError> {
        let reference = reference
            .map(|r| r.parse::<DocumentReference>())
            .transpose()?;
        let db = self.db.lock()?;
        let chain = LockModuleChain::standard(&*db);
        Ok(chain.get_lock(reference.as_ref()).map(Into::into))
    }

    /// Same as [`Self::get_family_lock`], as a status record.
    pub fn get_lock_status(
        &self,
        reference: Option<String>,
    ) -> Result<FfiLockStatus, FamilyStudiesError> {
        let lock = self.get_family_lock(reference)?;
        Ok(FfiLockStatus {
            locked: lock.is_some(),
            lock,
        })
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub external_id: Option<String>,
    pub document: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            document: patient.document.to_string(),
            patient_id: patient.id,
            external_id: patient.external_id,
        }
    }
}

/// FFI-safe family.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFamily {
    pub family_id: String,
    pub document: String,
    pub members: Vec<FfiPatient>,
}

impl From<Family> for FfiFamily {
    fn from(family: Family) -> Self {
        Self {
            document: family.document.to_string(),
            family_id: family.id,
            members: family.members.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe lock. `acquired_at` is RFC 3339.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiDocumentLock {
    pub holder_key: String,
    pub holder_display_name: String,
    pub acquired_at: String,
}

impl From<DocumentLock> for FfiDocumentLock {
    fn from(lock: DocumentLock) -> Self {
        Self {
            holder_key: lock.holder_key,
            holder_display_name: lock.holder_display_name,
            acquired_at: rfc3339(&lock.acquired_at),
        }
    }
}

/// FFI-safe lock status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLockStatus {
    pub locked: bool,
    pub lock: Option<FfiDocumentLock>,
}

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}
