//! Family models.

use serde::{Deserialize, Serialize};

use super::{DocumentReference, Patient};

/// Space holding family documents.
pub const FAMILY_SPACE: &str = "Families";

/// A grouping of patient records related by pedigree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Family {
    /// Family identifier (local name of the family document)
    pub id: String,
    /// Backing family document
    pub document: DocumentReference,
    /// Members in the order the repository stores them
    pub members: Vec<Patient>,
}

impl Family {
    /// Create an empty family in the default wiki's family space.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            document: DocumentReference::new(super::DEFAULT_WIKI, FAMILY_SPACE, id.clone()),
            id,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Patient] {
        &self.members
    }

    pub fn is_member(&self, patient_id: &str) -> bool {
        self.members.iter().any(|p| p.id == patient_id)
    }
}
