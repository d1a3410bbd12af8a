//! History database operations. Entries are never updated or deleted.

use rusqlite::{params, OptionalExtension, Row};

use super::{write_error, Database, DbResult};
use crate::models::{HistoryEntry, HistoryFilter, HistoryRecord};

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        record: HistoryRecord {
            patient_id: row.get(1)?,
            therapist_id: row.get(2)?,
            date: row.get(3)?,
            description: row.get(4)?,
            record_type: row.get(5)?,
        },
    })
}

impl Database {
    /// Append a history entry.
    pub fn insert_history(&self, record: &HistoryRecord) -> DbResult<HistoryEntry> {
        self.conn
            .execute(
                r#"
                INSERT INTO historiales (pacienteId, terapeutaId, fecha, descripcion, tipoRegistro)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.patient_id,
                    record.therapist_id,
                    record.date,
                    record.description,
                    record.record_type,
                ],
            )
            .map_err(write_error)?;
        Ok(HistoryEntry {
            id: self.conn.last_insert_rowid(),
            record: record.clone(),
        })
    }

    pub fn get_history(&self, id: i64) -> DbResult<Option<HistoryEntry>> {
        self.conn
            .query_row(
                r#"
                SELECT id, pacienteId, terapeutaId, fecha, descripcion, tipoRegistro
                FROM historiales
                WHERE id = ?
                "#,
                [id],
                entry_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List entries matching `filter`, newest first.
    pub fn list_history(&self, filter: &HistoryFilter) -> DbResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, pacienteId, terapeutaId, fecha, descripcion, tipoRegistro
            FROM historiales
            WHERE (?1 IS NULL OR pacienteId = ?1)
              AND (?2 IS NULL OR terapeutaId = ?2)
              AND (?3 IS NULL OR tipoRegistro = ?3)
            ORDER BY fecha DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map(
            params![filter.patient_id, filter.therapist_id, filter.record_type],
            entry_from_row,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn count_history_for_patient(&self, patient_id: i64) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM historiales WHERE pacienteId = ?",
                [patient_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    pub fn count_history_for_therapist(&self, therapist_id: i64) -> DbResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM historiales WHERE terapeutaId = ?",
                [therapist_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}
