//! Family database operations.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::documents::insert_document_row;
use super::patients::{PatientRow, PATIENT_COLUMNS};
use super::{format_timestamp, reference_from_columns, Database};
use crate::models::Family;
use crate::store::{FamilyRepository, StoreError, StoreResult};

impl Database {
    /// Insert a family, its document and its members in order.
    ///
    /// Members must already be stored as patients.
    pub fn insert_family(&self, family: &Family) -> StoreResult<()> {
        let created_at = Utc::now();
        let tx = self.conn.unchecked_transaction()?;
        insert_document_row(&tx, &family.document, &created_at)?;
        tx.execute(
            r#"
            INSERT INTO families (family_id, doc_wiki, doc_space, doc_name, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                family.id,
                family.document.wiki,
                family.document.space,
                family.document.name,
                format_timestamp(&created_at),
            ],
        )?;
        for (position, member) in family.members().iter().enumerate() {
            tx.execute(
                "INSERT INTO family_members (family_id, patient_id, position) VALUES (?1, ?2, ?3)",
                params![family.id, member.id, position as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Append a patient to a family.
    ///
    /// A patient can only belong to one family at a time.
    pub fn add_family_member(&self, family_id: &str, patient_id: &str) -> StoreResult<()> {
        if let Some(current) = self.family_id_for_patient(patient_id)? {
            return Err(StoreError::Constraint(format!(
                "patient {} already belongs to family {}",
                patient_id, current
            )));
        }

        self.conn.execute(
            r#"
            INSERT INTO family_members (family_id, patient_id, position)
            SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0)
            FROM family_members
            WHERE family_id = ?1
            "#,
            params![family_id, patient_id],
        )?;
        debug!(family_id, patient_id, "Added family member");
        Ok(())
    }

    /// Remove a patient from a family.
    pub fn remove_family_member(&self, family_id: &str, patient_id: &str) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM family_members WHERE family_id = ?1 AND patient_id = ?2",
            [family_id, patient_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// The family a patient belongs to, if any.
    pub fn family_id_for_patient(&self, patient_id: &str) -> StoreResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT family_id FROM family_members WHERE patient_id = ?",
                [patient_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a family with its members in insertion order.
    pub fn get_family(&self, family_id: &str) -> StoreResult<Option<Family>> {
        let header = self
            .conn
            .query_row(
                "SELECT family_id, doc_wiki, doc_space, doc_name FROM families WHERE family_id = ?",
                [family_id],
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

        let Some((id, wiki, space, name)) = header else {
            return Ok(None);
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM family_members m
            JOIN patients p ON p.patient_id = m.patient_id
            WHERE m.family_id = ?
            ORDER BY m.position
            "#,
            PATIENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([family_id], PatientRow::from_row)?;
        let members = rows
            .map(|row| row.map_err(StoreError::from).and_then(PatientRow::into_patient))
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Some(Family {
            id,
            document: reference_from_columns(wiki, space, name),
            members,
        }))
    }

    /// Delete a family. Member patients are kept.
    pub fn delete_family(&self, family_id: &str) -> StoreResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM families WHERE family_id = ?", [family_id])?;
        Ok(rows_affected > 0)
    }
}

impl FamilyRepository for Database {
    fn get_family_by_id(&self, id: &str) -> StoreResult<Option<Family>> {
        self.get_family(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::parse_timestamp;
    use crate::models::Patient;

    fn setup_db(patients: &[&str]) -> Database {
        let db = Database::open_in_memory().unwrap();
        for id in patients {
            db.insert_patient(&Patient::new(*id)).unwrap();
        }
        db
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let db = setup_db(&["P1", "P2", "P3"]);
        db.insert_family(&Family::new("F01")).unwrap();

        db.add_family_member("F01", "P2").unwrap();
        db.add_family_member("F01", "P1").unwrap();
        db.add_family_member("F01", "P3").unwrap();

        let family = db.get_family_by_id("F01").unwrap().unwrap();
        let ids: Vec<_> = family.members().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P2", "P1", "P3"]);
        assert_eq!(family.document.to_string(), "xwiki:Families.F01");
    }

    #[test]
    fn test_insert_family_with_members() {
        let db = setup_db(&["P1", "P2"]);
        let mut family = Family::new("F01");
        family.members = vec![Patient::new("P2"), Patient::new("P1")];

        db.insert_family(&family).unwrap();

        let stored = db.get_family("F01").unwrap().unwrap();
        assert_eq!(stored.members()[0].id, "P2");
        assert_eq!(stored.members()[1].id, "P1");
        assert_eq!(db.family_id_for_patient("P1").unwrap(), Some("F01".into()));
    }

    #[test]
    fn test_unknown_family() {
        let db = setup_db(&[]);
        assert!(db.get_family_by_id("F001").unwrap().is_none());
    }

    #[test]
    fn test_empty_family() {
        let db = setup_db(&[]);
        db.insert_family(&Family::new("F01")).unwrap();

        let family = db.get_family("F01").unwrap().unwrap();
        assert!(family.members().is_empty());
    }

    #[test]
    fn test_patient_in_one_family_only() {
        let db = setup_db(&["P1"]);
        db.insert_family(&Family::new("F01")).unwrap();
        db.insert_family(&Family::new("F02")).unwrap();

        db.add_family_member("F01", "P1").unwrap();
        assert!(matches!(
            db.add_family_member("F02", "P1"),
            Err(StoreError::Constraint(_))
        ));

        assert!(db.remove_family_member("F01", "P1").unwrap());
        db.add_family_member("F02", "P1").unwrap();
        assert_eq!(db.family_id_for_patient("P1").unwrap(), Some("F02".into()));
    }

    #[test]
    fn test_created_at_is_rfc3339() {
        let db = setup_db(&[]);
        db.insert_family(&Family::new("F01")).unwrap();

        let raw: String = db
            .conn()
            .query_row("SELECT created_at FROM families WHERE family_id = 'F01'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(parse_timestamp(&raw).is_ok());
    }

    #[test]
    fn test_delete_family_keeps_patients() {
        let db = setup_db(&["P1"]);
        db.insert_family(&Family::new("F01")).unwrap();
        db.add_family_member("F01", "P1").unwrap();

        assert!(db.delete_family("F01").unwrap());
        assert!(db.get_family("F01").unwrap().is_none());
        assert!(db.get_patient("P1").unwrap().is_some());
        assert!(db.family_id_for_patient("P1").unwrap().is_none());
    }
}
