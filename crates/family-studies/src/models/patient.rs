//! Patient models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DocumentReference;

/// Space holding patient record documents.
pub const PATIENT_SPACE: &str = "data";

/// A patient record. As a family member it exposes the document that may
/// carry an editing lock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Patient identifier, also the local name of its document
    pub id: String,
    /// Identifier assigned by an external system (lab, registry)
    pub external_id: Option<String>,
    /// Backing document
    pub document: DocumentReference,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Create a patient stored in the default wiki's patient space.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            document: DocumentReference::new(super::DEFAULT_WIKI, PATIENT_SPACE, id.clone()),
            id,
            external_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a patient with a generated identifier.
    pub fn generate() -> Self {
        Self::new(format!("P{}", uuid::Uuid::new_v4().simple()))
    }

    /// The member's backing document.
    pub fn document(&self) -> &DocumentReference {
        &self.document
    }
}
