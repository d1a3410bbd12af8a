//! Psicopedagogía Core Library
//!
//! Clinical records for a psychopedagogy practice: patients, therapist
//! accounts, append-only history entries and two reference lists.
//!
//! # Architecture
//!
//! ```text
//!  raw JSON payload
//!        │
//!        ▼
//!   validation ──── ValidationErrors (all violations, in rule order)
//!        │
//!        ▼
//!   ClinicCore ──── uniqueness / reference checks under the DB lock
//!        │
//!        ▼
//!   Database (SQLite, UNIQUE + FOREIGN KEY enforced)
//! ```
//!
//! Password hashing runs outside the database lock.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Patient, Therapist, HistoryEntry, ReferenceItem)
//! - [`validation`]: Payload normalization and field rules
//! - [`auth`]: Argon2 password hashing and signed session tokens

pub mod auth;
pub mod db;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use auth::{Argon2Hasher, AuthError, Claims, HashParams, TokenIssuer};
pub use db::{Database, DbError};
pub use models::{
    HistoryEntry, HistoryFilter, HistoryPayload, LoginPayload, Patient, PatientPayload,
    ReferenceItem, ReferenceList, ReferencePayload, Therapist, TherapistPayload,
};
pub use validation::{FieldError, ValidationErrors};

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

pub const MSG_PATIENT_NOT_FOUND: &str = "Paciente no encontrado";
pub const MSG_THERAPIST_NOT_FOUND: &str = "Terapeuta no encontrado";
pub const MSG_HISTORY_NOT_FOUND: &str = "Historial no encontrado";
pub const MSG_DUPLICATE_DNI: &str = "El DNI ya se encuentra registrado";
pub const MSG_DUPLICATE_USERNAME: &str = "El usuario ya está registrado";
pub const MSG_INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos";
pub const MSG_PATIENT_HAS_HISTORY: &str =
    "No se puede eliminar el paciente porque tiene historiales asociados";
pub const MSG_THERAPIST_HAS_HISTORY: &str =
    "No se puede eliminar el terapeuta porque tiene historiales asociados";
pub const MSG_PATIENT_MISSING: &str = "El paciente indicado no existe";
pub const MSG_THERAPIST_MISSING: &str = "El terapeuta indicado no existe";
pub const MSG_RECORD_TYPE_UNKNOWN: &str = "El tipo de registro no está registrado";

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{}", MSG_INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

impl From<DbError> for ClinicError {
    fn from(e: DbError) -> Self {
        ClinicError::Database(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::Database(format!("Lock poisoned: {}", e))
    }
}

/// Map a store-level constraint violation onto the same conflict the
/// pre-check reports.
fn conflict_on_constraint(message: &'static str) -> impl FnOnce(DbError) -> ClinicError {
    move |err| match err {
        DbError::Constraint(detail) => {
            warn!(%detail, "constraint violation caught by the store");
            ClinicError::Conflict(message.to_string())
        }
        other => other.into(),
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe entry point for every clinical-records operation.
///
/// All database access goes through one connection behind a mutex, so a
/// uniqueness pre-check and the write that follows it cannot interleave with
/// another request's.
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
    hasher: Argon2Hasher,
}

impl ClinicCore {
    pub fn new(db: Database, hasher: Argon2Hasher) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            hasher,
        }
    }

    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P, params: HashParams) -> ClinicResult<Self> {
        let db = Database::open(path)?;
        Ok(Self::new(db, Argon2Hasher::new(params)?))
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory(params: HashParams) -> ClinicResult<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::new(db, Argon2Hasher::new(params)?))
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let db = self.db.lock()?;
        Ok(db.list_patients()?)
    }

    pub fn get_patient(&self, id: i64) -> ClinicResult<Patient> {
        let db = self.db.lock()?;
        db.get_patient(id)?
            .ok_or_else(|| ClinicError::NotFound(MSG_PATIENT_NOT_FOUND.into()))
    }

    /// Validate, check `dni` uniqueness and persist a new patient.
    pub fn create_patient(&self, payload: &PatientPayload) -> ClinicResult<Patient> {
        let record = validation::validate_patient(payload)?;

        let db = self.db.lock()?;
        if db.find_patient_by_dni(&record.dni, None)?.is_some() {
            return Err(ClinicError::Conflict(MSG_DUPLICATE_DNI.into()));
        }
        let patient = db
            .insert_patient(&record)
            .map_err(conflict_on_constraint(MSG_DUPLICATE_DNI))?;

        info!(patient_id = patient.id, "patient created");
        Ok(patient)
    }

    /// Replace a patient's fields. The patient's own `dni` does not count as
    /// a duplicate.
    pub fn update_patient(&self, id: i64, payload: &PatientPayload) -> ClinicResult<Patient> {
        let record = validation::validate_patient(payload)?;

        let db = self.db.lock()?;
        if db.find_patient_by_dni(&record.dni, Some(id))?.is_some() {
            return Err(ClinicError::Conflict(MSG_DUPLICATE_DNI.into()));
        }
        let updated = db
            .update_patient(id, &record)
            .map_err(conflict_on_constraint(MSG_DUPLICATE_DNI))?;
        if !updated {
            return Err(ClinicError::NotFound(MSG_PATIENT_NOT_FOUND.into()));
        }

        info!(patient_id = id, "patient updated");
        Ok(Patient::new(id, record))
    }

    /// Delete a patient. Blocked while history entries reference it.
    pub fn delete_patient(&self, id: i64) -> ClinicResult<()> {
        let db = self.db.lock()?;
        if db.get_patient(id)?.is_none() {
            return Err(ClinicError::NotFound(MSG_PATIENT_NOT_FOUND.into()));
        }
        if db.count_history_for_patient(id)? > 0 {
            return Err(ClinicError::Conflict(MSG_PATIENT_HAS_HISTORY.into()));
        }
        db.delete_patient(id)
            .map_err(conflict_on_constraint(MSG_PATIENT_HAS_HISTORY))?;

        info!(patient_id = id, "patient deleted");
        Ok(())
    }

    // =========================================================================
    // Therapist Operations
    // =========================================================================

    pub fn list_therapists(&self) -> ClinicResult<Vec<Therapist>> {
        let db = self.db.lock()?;
        Ok(db.list_therapists()?)
    }

    pub fn get_therapist(&self, id: i64) -> ClinicResult<Therapist> {
        let db = self.db.lock()?;
        db.get_therapist(id)?
            .ok_or_else(|| ClinicError::NotFound(MSG_THERAPIST_NOT_FOUND.into()))
    }

    pub fn create_therapist(&self, payload: &TherapistPayload) -> ClinicResult<Therapist> {
        let draft = validation::validate_therapist(payload)?;
        let password_hash = self.hasher.hash(&draft.password)?;

        let db = self.db.lock()?;
        if db.find_therapist_by_username(&draft.username, None)?.is_some() {
            return Err(ClinicError::Conflict(MSG_DUPLICATE_USERNAME.into()));
        }
        let therapist = db
            .insert_therapist(&draft.username, &password_hash, draft.is_admin)
            .map_err(conflict_on_constraint(MSG_DUPLICATE_USERNAME))?;

        info!(therapist_id = therapist.id, is_admin = therapist.is_admin, "therapist created");
        Ok(therapist)
    }

    /// Replace a therapist's username, password and admin flag.
    pub fn update_therapist(&self, id: i64, payload: &TherapistPayload) -> ClinicResult<Therapist> {
        let draft = validation::validate_therapist(payload)?;
        let password_hash = self.hasher.hash(&draft.password)?;

        let db = self.db.lock()?;
        if db
            .find_therapist_by_username(&draft.username, Some(id))?
            .is_some()
        {
            return Err(ClinicError::Conflict(MSG_DUPLICATE_USERNAME.into()));
        }
        let updated = db
            .update_therapist(id, &draft.username, &password_hash, draft.is_admin)
            .map_err(conflict_on_constraint(MSG_DUPLICATE_USERNAME))?;
        if !updated {
            return Err(ClinicError::NotFound(MSG_THERAPIST_NOT_FOUND.into()));
        }

        info!(therapist_id = id, "therapist updated");
        Ok(Therapist {
            id,
            username: draft.username,
            is_admin: draft.is_admin,
        })
    }

    /// Delete a therapist account. Blocked while history entries reference it.
    pub fn delete_therapist(&self, id: i64) -> ClinicResult<()> {
        let db = self.db.lock()?;
        if db.get_therapist(id)?.is_none() {
            return Err(ClinicError::NotFound(MSG_THERAPIST_NOT_FOUND.into()));
        }
        if db.count_history_for_therapist(id)? > 0 {
            return Err(ClinicError::Conflict(MSG_THERAPIST_HAS_HISTORY.into()));
        }
        db.delete_therapist(id)
            .map_err(conflict_on_constraint(MSG_THERAPIST_HAS_HISTORY))?;

        info!(therapist_id = id, "therapist deleted");
        Ok(())
    }

    /// Check login credentials.
    ///
    /// Unknown usernames still pay for one Argon2 verification, and both
    /// failure paths return [`ClinicError::InvalidCredentials`].
    pub fn authenticate(&self, payload: &LoginPayload) -> ClinicResult<Therapist> {
        let (username, password) = validation::validate_login(payload)?;

        let credentials = {
            let db = self.db.lock()?;
            db.get_therapist_credentials(&username)?
        };

        match credentials {
            Some(creds) if self.hasher.verify(&password, &creds.password_hash)? => {
                info!(therapist_id = creds.therapist.id, "login succeeded");
                Ok(creds.therapist)
            }
            Some(creds) => {
                warn!(therapist_id = creds.therapist.id, "login failed: wrong password");
                Err(ClinicError::InvalidCredentials)
            }
            None => {
                self.hasher.verify_dummy(&password);
                warn!("login failed: unknown user");
                Err(ClinicError::InvalidCredentials)
            }
        }
    }

    /// Create the first admin account when no therapist exists yet.
    ///
    /// Returns `None` if the table already has rows.
    pub fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> ClinicResult<Option<Therapist>> {
        if self.db.lock()?.count_therapists()? > 0 {
            return Ok(None);
        }

        let payload = TherapistPayload {
            username: Some(username.into()),
            password: Some(password.into()),
            is_admin: Some(true.into()),
        };
        let therapist = self.create_therapist(&payload)?;
        info!(therapist_id = therapist.id, usuario = %therapist.username, "bootstrap admin created");
        Ok(Some(therapist))
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    pub fn list_history(&self, filter: &HistoryFilter) -> ClinicResult<Vec<HistoryEntry>> {
        let db = self.db.lock()?;
        Ok(db.list_history(filter)?)
    }

    pub fn get_history(&self, id: i64) -> ClinicResult<HistoryEntry> {
        let db = self.db.lock()?;
        db.get_history(id)?
            .ok_or_else(|| ClinicError::NotFound(MSG_HISTORY_NOT_FOUND.into()))
    }

    /// Append a history entry.
    ///
    /// The referenced patient and therapist must exist. When any record type
    /// is registered, `tipoRegistro` must name one of them.
    pub fn create_history(&self, payload: &HistoryPayload) -> ClinicResult<HistoryEntry> {
        let record = validation::validate_history(payload)?;

        let db = self.db.lock()?;
        let mut errors = ValidationErrors::new();
        if db.get_patient(record.patient_id)?.is_none() {
            errors.push("pacienteId", MSG_PATIENT_MISSING);
        }
        if db.get_therapist(record.therapist_id)?.is_none() {
            errors.push("terapeutaId", MSG_THERAPIST_MISSING);
        }
        if db.count_reference(ReferenceList::RecordTypes)? > 0
            && !db.reference_exists(ReferenceList::RecordTypes, &record.record_type)?
        {
            errors.push("tipoRegistro", MSG_RECORD_TYPE_UNKNOWN);
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let entry = db.insert_history(&record)?;
        info!(
            history_id = entry.id,
            patient_id = entry.record.patient_id,
            "history entry created"
        );
        Ok(entry)
    }

    // =========================================================================
    // Reference List Operations
    // =========================================================================

    pub fn list_reference(&self, list: ReferenceList) -> ClinicResult<Vec<ReferenceItem>> {
        let db = self.db.lock()?;
        Ok(db.list_reference(list)?)
    }

    pub fn create_reference(
        &self,
        list: ReferenceList,
        payload: &ReferencePayload,
    ) -> ClinicResult<ReferenceItem> {
        let name = validation::validate_reference(list, payload)?;

        let db = self.db.lock()?;
        if db.reference_exists(list, &name)? {
            return Err(ClinicError::Conflict(list.duplicate_message().into()));
        }
        let item = db
            .insert_reference(list, &name)
            .map_err(conflict_on_constraint(list.duplicate_message()))?;

        info!(table = list.table(), id = item.id, "reference item created");
        Ok(item)
    }
}
