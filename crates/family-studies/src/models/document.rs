//! Document references and resolved documents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default wiki for references that omit one.
pub const DEFAULT_WIKI: &str = "xwiki";

/// Errors raised while parsing a document reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Empty document reference")]
    Empty,

    #[error("Malformed document reference: {0}")]
    Malformed(String),
}

/// Points at a stored document: `wiki:space.name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentReference {
    pub wiki: String,
    pub space: String,
    /// Local name. For family documents this is the family identifier.
    pub name: String,
}

impl DocumentReference {
    pub fn new(wiki: impl Into<String>, space: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            wiki: wiki.into(),
            space: space.into(),
            name: name.into(),
        }
    }

    /// The document's local (base) name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.wiki, self.space, self.name)
    }
}

impl FromStr for DocumentReference {
    type Err = ReferenceError;

    /// Parse `wiki:space.name` or `space.name` (default wiki).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let (wiki, rest) = match s.split_once(':') {
            Some((wiki, rest)) => (wiki, rest),
            None => (DEFAULT_WIKI, s),
        };

        // Space names may contain dots, the local name may not.
        let (space, name) = rest
            .rsplit_once('.')
            .ok_or_else(|| ReferenceError::Malformed(s.to_string()))?;

        if wiki.is_empty() || space.is_empty() || name.is_empty() {
            return Err(ReferenceError::Malformed(s.to_string()));
        }

        Ok(Self::new(wiki, space, name))
    }
}

/// A document as returned by the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Canonical reference of the resolved document
    pub reference: DocumentReference,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(reference: DocumentReference) -> Self {
        Self {
            reference,
            created_at: Utc::now(),
        }
    }

    pub fn reference(&self) -> &DocumentReference {
        &self.reference
    }
}
