//! Reference list database operations.

use rusqlite::OptionalExtension;

use super::{write_error, Database, DbResult};
use crate::models::{ReferenceItem, ReferenceList};

impl Database {
    /// Append a name to a reference list.
    pub fn insert_reference(&self, list: ReferenceList, name: &str) -> DbResult<ReferenceItem> {
        self.conn
            .execute(
                &format!("INSERT INTO {} (nombre) VALUES (?)", list.table()),
                [name],
            )
            .map_err(write_error)?;
        Ok(ReferenceItem {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub fn list_reference(&self, list: ReferenceList) -> DbResult<Vec<ReferenceItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, nombre FROM {} ORDER BY id", list.table()))?;
        let rows = stmt.query_map([], |row| {
            Ok(ReferenceItem {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn reference_exists(&self, list: ReferenceList, name: &str) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT id FROM {} WHERE nombre = ?", list.table()),
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn count_reference(&self, list: ReferenceList) -> DbResult<i64> {
        self.conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", list.table()),
                [],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;

    #[test]
    fn test_record_types_start_empty() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.count_reference(ReferenceList::RecordTypes).unwrap(), 0);
        assert!(db.count_reference(ReferenceList::EducationLevels).unwrap() > 0);
    }

    #[test]
    fn test_insert_list_and_exists() {
        let db = Database::open_in_memory().unwrap();
        let item = db
            .insert_reference(ReferenceList::RecordTypes, "Entrevista")
            .unwrap();

        assert_eq!(
            db.list_reference(ReferenceList::RecordTypes).unwrap(),
            vec![item]
        );
        assert!(db
            .reference_exists(ReferenceList::RecordTypes, "Entrevista")
            .unwrap());
        assert!(!db
            .reference_exists(ReferenceList::EducationLevels, "Entrevista")
            .unwrap());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.insert_reference(ReferenceList::RecordTypes, "Entrevista")
            .unwrap();
        assert!(matches!(
            db.insert_reference(ReferenceList::RecordTypes, "Entrevista"),
            Err(DbError::Constraint(_))
        ));
    }
}
