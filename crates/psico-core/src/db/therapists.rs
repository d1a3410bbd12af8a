//! Therapist database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{write_error, Database, DbResult};
use crate::models::{Therapist, TherapistCredentials};

fn therapist_from_row(row: &Row<'_>) -> rusqlite::Result<Therapist> {
    Ok(Therapist {
        id: row.get(0)?,
        username: row.get(1)?,
        is_admin: row.get(2)?,
    })
}

impl Database {
    /// Insert a therapist with an already-hashed password.
    pub fn insert_therapist(
        &self,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> DbResult<Therapist> {
        self.conn
            .execute(
                "INSERT INTO terapeutas (usuario, contrasenia, es_admin) VALUES (?1, ?2, ?3)",
                params![username, password_hash, is_admin],
            )
            .map_err(write_error)?;
        Ok(Therapist {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            is_admin,
        })
    }

    /// Replace a therapist's username, hash and admin flag.
    pub fn update_therapist(
        &self,
        id: i64,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE terapeutas SET usuario = ?2, contrasenia = ?3, es_admin = ?4 WHERE id = ?1",
                params![id, username, password_hash, is_admin],
            )
            .map_err(write_error)?;
        Ok(rows_affected > 0)
    }

    /// Get a therapist's public view by id.
    pub fn get_therapist(&self, id: i64) -> DbResult<Option<Therapist>> {
        self.conn
            .query_row(
                "SELECT id, usuario, es_admin FROM terapeutas WHERE id = ?",
                [id],
                therapist_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Load the stored credentials for a username (login path only).
    pub fn get_therapist_credentials(&self, username: &str) -> DbResult<Option<TherapistCredentials>> {
        self.conn
            .query_row(
                "SELECT id, usuario, es_admin, contrasenia FROM terapeutas WHERE usuario = ?",
                [username],
                |row| {
                    Ok(TherapistCredentials {
                        therapist: therapist_from_row(row)?,
                        password_hash: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find the id of a therapist holding `username`, ignoring the row `excluding`.
    pub fn find_therapist_by_username(
        &self,
        username: &str,
        excluding: Option<i64>,
    ) -> DbResult<Option<i64>> {
        self.conn
            .query_row(
                "SELECT id FROM terapeutas WHERE usuario = ?1 AND (?2 IS NULL OR id <> ?2)",
                params![username, excluding],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all therapists (public view, no hashes).
    pub fn list_therapists(&self) -> DbResult<Vec<Therapist>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, usuario, es_admin FROM terapeutas ORDER BY id")?;
        let rows = stmt.query_map([], therapist_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn count_therapists(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM terapeutas", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Delete a therapist. Returns false if no row has that id.
    pub fn delete_therapist(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM terapeutas WHERE id = ?", [id])
            .map_err(write_error)?;
        Ok(rows_affected > 0)
    }
}
