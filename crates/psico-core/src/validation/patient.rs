//! Patient payload rules.

use chrono::{DateTime, Utc};

use super::{integer, parse_date, text, ValidationErrors};
use crate::models::{PatientPayload, PatientRecord};

pub const MIN_DNI_LEN: usize = 8;
pub const MAX_CONSULTATION_REASON_LEN: usize = 500;
pub const GRADE_RANGE: std::ops::RangeInclusive<i64> = 1..=7;

pub const MSG_FIRST_NAME_EMPTY: &str = "El nombre no debe estar vacío";
pub const MSG_LAST_NAME_EMPTY: &str = "El apellido no debe estar vacío";
pub const MSG_DNI_TOO_SHORT: &str = "El DNI debe tener al menos 8 caracteres";
pub const MSG_PHONE_EMPTY: &str = "El teléfono no debe estar vacío";
pub const MSG_BIRTH_DATE_MISSING: &str = "La fecha de nacimiento es obligatoria";
pub const MSG_BIRTH_DATE_INVALID: &str = "La fecha de nacimiento no es válida";
pub const MSG_BIRTH_DATE_NOT_PAST: &str =
    "La fecha de nacimiento debe ser anterior a la fecha actual";
pub const MSG_REASON_TOO_LONG: &str = "El motivo de consulta no debe superar los 500 caracteres";
pub const MSG_EDUCATION_LEVEL_EMPTY: &str = "El nivel educativo no debe estar vacío";
pub const MSG_GRADE_OUT_OF_RANGE: &str = "El grado/curso debe ser un número entre 1 y 7";
pub const MSG_GENDER_EMPTY: &str = "El género no debe estar vacío";

/// Normalize and validate a patient payload against the current instant.
pub fn validate_patient(payload: &PatientPayload) -> Result<PatientRecord, ValidationErrors> {
    validate_patient_at(payload, Utc::now())
}

/// Normalize and validate a patient payload, judging the birth date against `now`.
pub fn validate_patient_at(
    payload: &PatientPayload,
    now: DateTime<Utc>,
) -> Result<PatientRecord, ValidationErrors> {
    let record = PatientRecord {
        first_name: text(&payload.first_name),
        last_name: text(&payload.last_name),
        dni: text(&payload.dni),
        phone: text(&payload.phone),
        birth_date: text(&payload.birth_date),
        consultation_reason: text(&payload.consultation_reason),
        education_level: text(&payload.education_level),
        grade: integer(&payload.grade).unwrap_or(0),
        gender: text(&payload.gender),
    };

    let mut errors = ValidationErrors::new();

    if record.first_name.is_empty() {
        errors.push("nombre", MSG_FIRST_NAME_EMPTY);
    }
    if record.last_name.is_empty() {
        errors.push("apellido", MSG_LAST_NAME_EMPTY);
    }
    if record.dni.chars().count() < MIN_DNI_LEN {
        errors.push("dni", MSG_DNI_TOO_SHORT);
    }
    if record.phone.is_empty() {
        errors.push("telefono", MSG_PHONE_EMPTY);
    }

    if record.birth_date.is_empty() {
        errors.push("fechaNac", MSG_BIRTH_DATE_MISSING);
    } else {
        match parse_date(&record.birth_date) {
            None => errors.push("fechaNac", MSG_BIRTH_DATE_INVALID),
            Some(born) if born >= now => errors.push("fechaNac", MSG_BIRTH_DATE_NOT_PAST),
            Some(_) => {}
        }
    }

    if record.consultation_reason.chars().count() > MAX_CONSULTATION_REASON_LEN {
        errors.push("motivoConsulta", MSG_REASON_TOO_LONG);
    }
    if record.education_level.is_empty() {
        errors.push("nivelEducativo", MSG_EDUCATION_LEVEL_EMPTY);
    }
    if !GRADE_RANGE.contains(&record.grade) {
        errors.push("gradoCurso", MSG_GRADE_OUT_OF_RANGE);
    }
    if record.gender.is_empty() {
        errors.push("genero", MSG_GENDER_EMPTY);
    }

    errors.into_result(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn payload(value: Value) -> PatientPayload {
        serde_json::from_value(value).unwrap()
    }

    fn valid_json() -> Value {
        json!({
            "nombre": "Ana",
            "apellido": "Diaz",
            "dni": "30111222",
            "telefono": "1122334455",
            "fechaNac": "2010-05-01",
            "nivelEducativo": "Primario (en curso)",
            "gradoCurso": 5,
            "genero": "Femenino"
        })
    }

    #[test]
    fn test_valid_payload_normalizes() {
        let mut raw = valid_json();
        raw["nombre"] = json!("  Ana  ");
        raw["gradoCurso"] = json!(" 5 ");

        let record = validate_patient_at(&payload(raw), fixed_now()).unwrap();
        assert_eq!(record.first_name, "Ana");
        assert_eq!(record.grade, 5);
        assert_eq!(record.consultation_reason, "");
    }

    #[test]
    fn test_empty_payload_reports_every_rule_in_order() {
        let errors = validate_patient_at(&PatientPayload::default(), fixed_now()).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                MSG_FIRST_NAME_EMPTY,
                MSG_LAST_NAME_EMPTY,
                MSG_DNI_TOO_SHORT,
                MSG_PHONE_EMPTY,
                MSG_BIRTH_DATE_MISSING,
                MSG_EDUCATION_LEVEL_EMPTY,
                MSG_GRADE_OUT_OF_RANGE,
                MSG_GENDER_EMPTY,
            ]
        );
    }

    #[test]
    fn test_short_dni_rejected() {
        let mut raw = valid_json();
        raw["dni"] = json!("1234567");
        let errors = validate_patient_at(&payload(raw), fixed_now()).unwrap_err();
        assert_eq!(errors.messages(), vec![MSG_DNI_TOO_SHORT]);
    }

    #[test]
    fn test_birth_date_must_be_in_the_past() {
        let now = fixed_now();
        let tomorrow = (now + Duration::days(1)).format("%Y-%m-%d").to_string();

        let mut raw = valid_json();
        raw["fechaNac"] = json!(tomorrow);
        let errors = validate_patient_at(&payload(raw), now).unwrap_err();
        assert!(errors.contains_message(MSG_BIRTH_DATE_NOT_PAST));

        let mut raw = valid_json();
        raw["fechaNac"] = json!("2026-10-16");
        assert!(validate_patient_at(&payload(raw), now).is_ok());
    }

    #[test]
    fn test_unparseable_birth_date() {
        let mut raw = valid_json();
        raw["fechaNac"] = json!("31/02/2010");
        let errors = validate_patient_at(&payload(raw), fixed_now()).unwrap_err();
        assert_eq!(errors.messages(), vec![MSG_BIRTH_DATE_INVALID]);
    }

    #[test]
    fn test_consultation_reason_limit_counts_characters() {
        let mut raw = valid_json();
        raw["motivoConsulta"] = json!("ñ".repeat(500));
        assert!(validate_patient_at(&payload(raw), fixed_now()).is_ok());

        let mut raw = valid_json();
        raw["motivoConsulta"] = json!("a".repeat(501));
        let errors = validate_patient_at(&payload(raw), fixed_now()).unwrap_err();
        assert_eq!(errors.messages(), vec![MSG_REASON_TOO_LONG]);
    }

    proptest! {
        #[test]
        fn prop_well_formed_payloads_validate(
            first in "[A-Za-z]{1,20}",
            last in "[A-Za-z]{1,20}",
            dni in "[0-9]{8,11}",
            grade in 1i64..=7,
            days_ago in 1i64..30000,
        ) {
            let now = fixed_now();
            let born = (now - Duration::days(days_ago)).format("%Y-%m-%d").to_string();
            let raw = json!({
                "nombre": first,
                "apellido": last,
                "dni": dni,
                "telefono": "1122334455",
                "fechaNac": born,
                "nivelEducativo": "Secundario (en curso)",
                "gradoCurso": grade,
                "genero": "No contesta"
            });
            let record = validate_patient_at(&payload(raw), now);
            prop_assert!(record.is_ok());
            prop_assert_eq!(record.unwrap().grade, grade);
        }

        #[test]
        fn prop_grade_outside_range_rejected(grade in prop_oneof![-100i64..=0, 8i64..=100]) {
            let mut raw = valid_json();
            raw["gradoCurso"] = json!(grade);
            let errors = validate_patient_at(&payload(raw), fixed_now()).unwrap_err();
            prop_assert_eq!(errors.messages(), vec![MSG_GRADE_OUT_OF_RANGE]);
        }
    }
}
