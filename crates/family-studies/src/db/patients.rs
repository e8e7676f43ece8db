//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::documents::insert_document_row;
use super::{format_timestamp, parse_timestamp, reference_from_columns, Database};
use crate::models::Patient;
use crate::store::StoreResult;

/// Columns selected for a patient, in [`PatientRow::from_row`] order.
pub(super) const PATIENT_COLUMNS: &str =
    "p.patient_id, p.external_id, p.doc_wiki, p.doc_space, p.doc_name, p.created_at";

/// Raw patient columns, converted once the row has been read.
pub(super) struct PatientRow {
    id: String,
    external_id: Option<String>,
    wiki: String,
    space: String,
    name: String,
    created_at: String,
}

impl PatientRow {
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            external_id: row.get(1)?,
            wiki: row.get(2)?,
            space: row.get(3)?,
            name: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    pub(super) fn into_patient(self) -> StoreResult<Patient> {
        Ok(Patient {
            id: self.id,
            external_id: self.external_id,
            document: reference_from_columns(self.wiki, self.space, self.name),
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl Database {
    /// Insert a new patient along with its document.
    pub fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_document_row(&tx, &patient.document, &patient.created_at)?;
        tx.execute(
            r#"
            INSERT INTO patients (
                patient_id, external_id, doc_wiki, doc_space, doc_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                patient.id,
                patient.external_id,
                patient.document.wiki,
                patient.document.space,
                patient.document.name,
                format_timestamp(&patient.created_at),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>> {
        let sql = format!("SELECT {} FROM patients p WHERE p.patient_id = ?", PATIENT_COLUMNS);
        self.conn
            .query_row(&sql, [patient_id], PatientRow::from_row)
            .optional()?
            .map(PatientRow::into_patient)
            .transpose()
    }

    /// Get a patient by external identifier.
    pub fn get_patient_by_external_id(&self, external_id: &str) -> StoreResult<Option<Patient>> {
        let sql = format!("SELECT {} FROM patients p WHERE p.external_id = ?", PATIENT_COLUMNS);
        self.conn
            .query_row(&sql, [external_id], PatientRow::from_row)
            .optional()?
            .map(PatientRow::into_patient)
            .transpose()
    }
}
