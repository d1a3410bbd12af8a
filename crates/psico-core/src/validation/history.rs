//! History entry payload rules.

use super::{integer, parse_date, text, ValidationErrors};
use crate::models::{HistoryPayload, HistoryRecord};

pub const MSG_PATIENT_ID_INVALID: &str = "El paciente es obligatorio";
pub const MSG_THERAPIST_ID_INVALID: &str = "El terapeuta es obligatorio";
pub const MSG_DATE_MISSING: &str = "La fecha es obligatoria";
pub const MSG_DATE_INVALID: &str = "La fecha no es válida";
pub const MSG_DESCRIPTION_EMPTY: &str = "La descripción es obligatoria";
pub const MSG_RECORD_TYPE_EMPTY: &str = "El tipo de registro es obligatorio";

/// Validate the shape of a history payload. Referential checks against the
/// store happen later, in [`crate::ClinicCore::create_history`].
pub fn validate_history(payload: &HistoryPayload) -> Result<HistoryRecord, ValidationErrors> {
    let patient_id = integer(&payload.patient_id).filter(|id| *id > 0);
    let therapist_id = integer(&payload.therapist_id).filter(|id| *id > 0);
    let record = HistoryRecord {
        patient_id: patient_id.unwrap_or(0),
        therapist_id: therapist_id.unwrap_or(0),
        date: text(&payload.date),
        description: text(&payload.description),
        record_type: text(&payload.record_type),
    };

    let mut errors = ValidationErrors::new();
    if patient_id.is_none() {
        errors.push("pacienteId", MSG_PATIENT_ID_INVALID);
    }
    if therapist_id.is_none() {
        errors.push("terapeutaId", MSG_THERAPIST_ID_INVALID);
    }
    if record.date.is_empty() {
        errors.push("fecha", MSG_DATE_MISSING);
    } else if parse_date(&record.date).is_none() {
        errors.push("fecha", MSG_DATE_INVALID);
    }
    if record.description.is_empty() {
        errors.push("descripcion", MSG_DESCRIPTION_EMPTY);
    }
    if record.record_type.is_empty() {
        errors.push("tipoRegistro", MSG_RECORD_TYPE_EMPTY);
    }

    errors.into_result(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_history_accepts_numeric_strings() {
        let payload: HistoryPayload = serde_json::from_value(json!({
            "pacienteId": "3",
            "terapeutaId": 1,
            "fecha": "2026-10-01",
            "descripcion": " Primera entrevista ",
            "tipoRegistro": "Entrevista"
        }))
        .unwrap();

        let record = validate_history(&payload).unwrap();
        assert_eq!(record.patient_id, 3);
        assert_eq!(record.therapist_id, 1);
        assert_eq!(record.description, "Primera entrevista");
    }

    #[test]
    fn test_all_fields_required() {
        let errors = validate_history(&HistoryPayload::default()).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.has_field("pacienteId"));
        assert!(errors.has_field("tipoRegistro"));
    }

    #[test]
    fn test_ids_must_be_positive() {
        let payload: HistoryPayload = serde_json::from_value(json!({
            "pacienteId": 0,
            "terapeutaId": -4,
            "fecha": "2026-10-01",
            "descripcion": "x",
            "tipoRegistro": "y"
        }))
        .unwrap();

        let errors = validate_history(&payload).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![MSG_PATIENT_ID_INVALID, MSG_THERAPIST_ID_INVALID]
        );
    }

    #[test]
    fn test_unparseable_date() {
        let payload: HistoryPayload = serde_json::from_value(json!({
            "pacienteId": 1,
            "terapeutaId": 1,
            "fecha": "mañana",
            "descripcion": "x",
            "tipoRegistro": "y"
        }))
        .unwrap();
        let errors = validate_history(&payload).unwrap_err();
        assert_eq!(errors.messages(), vec![MSG_DATE_INVALID]);
    }
}
