//! User identities.

use serde::{Deserialize, Serialize};

/// A resolved user identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Raw key as stored on locks (e.g. "XWiki.jdoe")
    pub key: String,
    /// Human readable name
    pub display_name: String,
}

impl User {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
        }
    }
}
