//! Database layer for the clinical records store.

mod history;
mod patients;
mod reference;
mod schema;
mod therapists;

pub use schema::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;

use crate::models::{ReferenceList, DEFAULT_EDUCATION_LEVELS};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Classify a failed write, separating constraint violations (UNIQUE,
/// FOREIGN KEY, CHECK) from other SQLite failures.
pub(crate) fn write_error(err: rusqlite::Error) -> DbError {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
            DbError::Constraint(msg.clone().unwrap_or_else(|| e.to_string()))
        }
        _ => DbError::Sqlite(err),
    }
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema and seed reference data.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        let table = ReferenceList::EducationLevels.table();
        let sql = format!("INSERT OR IGNORE INTO {table} (nombre) VALUES (?)");
        for level in DEFAULT_EDUCATION_LEVELS {
            self.conn.execute(&sql, [level])?;
        }
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
