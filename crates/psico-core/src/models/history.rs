//! Patient history models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dated clinical note tied to one patient and one therapist. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    #[serde(flatten)]
    pub record: HistoryRecord,
}

/// Normalized history fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    #[serde(rename = "pacienteId")]
    pub patient_id: i64,
    #[serde(rename = "terapeutaId")]
    pub therapist_id: i64,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipoRegistro")]
    pub record_type: String,
}

/// Raw history request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryPayload {
    #[serde(rename = "pacienteId")]
    pub patient_id: Option<Value>,
    #[serde(rename = "terapeutaId")]
    pub therapist_id: Option<Value>,
    #[serde(rename = "fecha")]
    pub date: Option<Value>,
    #[serde(rename = "descripcion")]
    pub description: Option<Value>,
    #[serde(rename = "tipoRegistro")]
    pub record_type: Option<Value>,
}

/// Optional filters for listing history entries. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryFilter {
    #[serde(rename = "pacienteId")]
    pub patient_id: Option<i64>,
    #[serde(rename = "terapeutaId")]
    pub therapist_id: Option<i64>,
    #[serde(rename = "tipoRegistro")]
    pub record_type: Option<String>,
}

impl HistoryFilter {
    pub fn for_patient(patient_id: i64) -> Self {
        Self {
            patient_id: Some(patient_id),
            ..Self::default()
        }
    }
}
