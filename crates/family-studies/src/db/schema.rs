//! SQLite schema definition.

/// Complete database schema for family studies.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Documents
-- ============================================================================

CREATE TABLE IF NOT EXISTS documents (
    wiki TEXT NOT NULL,
    space TEXT NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (wiki, space, name)
);

-- One active editing lock per document
CREATE TABLE IF NOT EXISTS document_locks (
    wiki TEXT NOT NULL,
    space TEXT NOT NULL,
    name TEXT NOT NULL,
    user_key TEXT NOT NULL,                      -- raw user key, not a display name
    acquired_at TEXT NOT NULL,
    PRIMARY KEY (wiki, space, name),
    FOREIGN KEY (wiki, space, name) REFERENCES documents(wiki, space, name) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_document_locks_user ON document_locks(user_key);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,
    external_id TEXT,
    doc_wiki TEXT NOT NULL,
    doc_space TEXT NOT NULL,
    doc_name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (doc_wiki, doc_space, doc_name) REFERENCES documents(wiki, space, name)
);

CREATE INDEX IF NOT EXISTS idx_patients_external_id ON patients(external_id);

-- ============================================================================
-- Families
-- ============================================================================

CREATE TABLE IF NOT EXISTS families (
    family_id TEXT PRIMARY KEY,
    doc_wiki TEXT NOT NULL,
    doc_space TEXT NOT NULL,
    doc_name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (doc_wiki, doc_space, doc_name) REFERENCES documents(wiki, space, name)
);

-- A patient belongs to at most one family; position keeps insertion order
CREATE TABLE IF NOT EXISTS family_members (
    family_id TEXT NOT NULL REFERENCES families(family_id) ON DELETE CASCADE,
    patient_id TEXT NOT NULL UNIQUE REFERENCES patients(patient_id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    PRIMARY KEY (family_id, patient_id)
);

CREATE INDEX IF NOT EXISTS idx_family_members_order ON family_members(family_id, position);

-- ============================================================================
-- Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    user_key TEXT PRIMARY KEY,
    display_name TEXT NOT NULL
);
"#;
