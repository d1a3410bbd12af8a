//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{write_error, Database, DbResult};
use crate::models::{Patient, PatientRecord};

const PATIENT_COLUMNS: &str = "id, nombre, apellido, dni, telefono, fechaNac, motivoConsulta, \
                               nivelEducativo, gradoCurso, genero";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        record: PatientRecord {
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            dni: row.get(3)?,
            phone: row.get(4)?,
            birth_date: row.get(5)?,
            consultation_reason: row.get(6)?,
            education_level: row.get(7)?,
            grade: row.get(8)?,
            gender: row.get(9)?,
        },
    })
}

impl Database {
    /// Insert a new patient, returning it with its assigned id.
    pub fn insert_patient(&self, record: &PatientRecord) -> DbResult<Patient> {
        self.conn
            .execute(
                r#"
                INSERT INTO pacientes (
                    nombre, apellido, dni, telefono, fechaNac,
                    motivoConsulta, nivelEducativo, gradoCurso, genero
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    record.first_name,
                    record.last_name,
                    record.dni,
                    record.phone,
                    record.birth_date,
                    record.consultation_reason,
                    record.education_level,
                    record.grade,
                    record.gender,
                ],
            )
            .map_err(write_error)?;
        Ok(Patient::new(self.conn.last_insert_rowid(), record.clone()))
    }

    /// Update an existing patient. Returns false if no row has that id.
    pub fn update_patient(&self, id: i64, record: &PatientRecord) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE pacientes SET
                    nombre = ?2,
                    apellido = ?3,
                    dni = ?4,
                    telefono = ?5,
                    fechaNac = ?6,
                    motivoConsulta = ?7,
                    nivelEducativo = ?8,
                    gradoCurso = ?9,
                    genero = ?10
                WHERE id = ?1
                "#,
                params![
                    id,
                    record.first_name,
                    record.last_name,
                    record.dni,
                    record.phone,
                    record.birth_date,
                    record.consultation_reason,
                    record.education_level,
                    record.grade,
                    record.gender,
                ],
            )
            .map_err(write_error)?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM pacientes WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find the id of a patient holding `dni`, ignoring the row `excluding`.
    pub fn find_patient_by_dni(&self, dni: &str, excluding: Option<i64>) -> DbResult<Option<i64>> {
        self.conn
            .query_row(
                "SELECT id FROM pacientes WHERE dni = ?1 AND (?2 IS NULL OR id <> ?2)",
                params![dni, excluding],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PATIENT_COLUMNS} FROM pacientes ORDER BY id"))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient. Returns false if no row has that id.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM pacientes WHERE id = ?", [id])
            .map_err(write_error)?;
        Ok(rows_affected > 0)
    }
}
