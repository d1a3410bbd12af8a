//! Patient models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A patient under care.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-assigned identifier
    pub id: i64,
    #[serde(flatten)]
    pub record: PatientRecord,
}

/// Normalized patient fields, as produced by validation and persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// National identity document number, unique across patients
    pub dni: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Date of birth as submitted (e.g. "2010-05-01")
    #[serde(rename = "fechaNac")]
    pub birth_date: String,
    /// Reason for consultation, at most 500 characters, may be empty
    #[serde(rename = "motivoConsulta")]
    pub consultation_reason: String,
    #[serde(rename = "nivelEducativo")]
    pub education_level: String,
    /// School grade/course, 1 through 7
    #[serde(rename = "gradoCurso")]
    pub grade: i64,
    #[serde(rename = "genero")]
    pub gender: String,
}

impl Patient {
    pub fn new(id: i64, record: PatientRecord) -> Self {
        Self { id, record }
    }
}

/// Raw patient request body.
///
/// Every field is kept as an untyped JSON value so that missing, `null` and
/// wrongly-typed fields all reach validation instead of failing to parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientPayload {
    #[serde(rename = "nombre")]
    pub first_name: Option<Value>,
    #[serde(rename = "apellido")]
    pub last_name: Option<Value>,
    pub dni: Option<Value>,
    #[serde(rename = "telefono")]
    pub phone: Option<Value>,
    #[serde(rename = "fechaNac")]
    pub birth_date: Option<Value>,
    #[serde(rename = "motivoConsulta")]
    pub consultation_reason: Option<Value>,
    #[serde(rename = "nivelEducativo")]
    pub education_level: Option<Value>,
    #[serde(rename = "gradoCurso")]
    pub grade: Option<Value>,
    #[serde(rename = "genero")]
    pub gender: Option<Value>,
}
