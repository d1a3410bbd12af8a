//! SQLite schema definition.

/// Complete database schema for the clinical records store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS pacientes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    apellido TEXT NOT NULL,
    dni TEXT NOT NULL UNIQUE,
    telefono TEXT NOT NULL,
    fechaNac TEXT NOT NULL,
    motivoConsulta TEXT NOT NULL DEFAULT '',
    nivelEducativo TEXT NOT NULL,
    gradoCurso INTEGER NOT NULL CHECK (gradoCurso BETWEEN 1 AND 7),
    genero TEXT NOT NULL
);

-- ============================================================================
-- Therapists
-- ============================================================================

CREATE TABLE IF NOT EXISTS terapeutas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    usuario TEXT NOT NULL UNIQUE,
    contrasenia TEXT NOT NULL,                   -- Argon2id PHC string, never plaintext
    es_admin INTEGER NOT NULL DEFAULT 0
);

-- ============================================================================
-- History (Append-Only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS historiales (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pacienteId INTEGER NOT NULL REFERENCES pacientes(id) ON DELETE RESTRICT,
    terapeutaId INTEGER NOT NULL REFERENCES terapeutas(id) ON DELETE RESTRICT,
    fecha TEXT NOT NULL,
    descripcion TEXT NOT NULL,
    tipoRegistro TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_historiales_paciente ON historiales(pacienteId);
CREATE INDEX IF NOT EXISTS idx_historiales_terapeuta ON historiales(terapeutaId);
CREATE INDEX IF NOT EXISTS idx_historiales_fecha ON historiales(fecha);

-- ============================================================================
-- Reference Lists
-- ============================================================================

CREATE TABLE IF NOT EXISTS tipos_registro (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS niveles_educativos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL UNIQUE
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = conn();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_dni_unique_constraint() {
        let conn = conn();
        let insert = "INSERT INTO pacientes (nombre, apellido, dni, telefono, fechaNac, nivelEducativo, gradoCurso, genero)
                      VALUES ('A', 'B', '30111222', '1', '2010-01-01', 'Primario', 3, 'F')";

        assert!(conn.execute(insert, []).is_ok());
        assert!(conn.execute(insert, []).is_err());
    }

    #[test]
    fn test_history_requires_existing_patient() {
        let conn = conn();
        conn.execute(
            "INSERT INTO terapeutas (usuario, contrasenia) VALUES ('t', 'h')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO historiales (pacienteId, terapeutaId, fecha, descripcion, tipoRegistro)
             VALUES (99, 1, '2026-01-01', 'x', 'y')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_autoincrement_ids_not_reused() {
        let conn = conn();
        conn.execute("INSERT INTO tipos_registro (nombre) VALUES ('a')", [])
            .unwrap();
        conn.execute("DELETE FROM tipos_registro", []).unwrap();
        conn.execute("INSERT INTO tipos_registro (nombre) VALUES ('b')", [])
            .unwrap();

        let id: i64 = conn
            .query_row("SELECT id FROM tipos_registro WHERE nombre = 'b'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(id, 2);
    }
}
