//! Controlled-vocabulary reference lists (record types, education levels).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in a reference list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceItem {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Raw reference-list request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferencePayload {
    #[serde(rename = "nombre")]
    pub name: Option<Value>,
}

/// The two reference lists. Both share one shape and one set of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceList {
    RecordTypes,
    EducationLevels,
}

impl ReferenceList {
    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            ReferenceList::RecordTypes => "tipos_registro",
            ReferenceList::EducationLevels => "niveles_educativos",
        }
    }

    pub(crate) fn missing_name_message(self) -> &'static str {
        match self {
            ReferenceList::RecordTypes => "El nombre del tipo de registro es obligatorio",
            ReferenceList::EducationLevels => "El nombre del nivel educativo es obligatorio",
        }
    }

    pub(crate) fn duplicate_message(self) -> &'static str {
        match self {
            ReferenceList::RecordTypes => "El tipo de registro ya existe",
            ReferenceList::EducationLevels => "El nivel educativo ya existe",
        }
    }
}

/// Education levels offered by the intake form, seeded on first boot.
pub const DEFAULT_EDUCATION_LEVELS: [&str; 18] = [
    "Inicial (en curso)",
    "Inicial (completo)",
    "Inicial (abandonado)",
    "Primario (en curso)",
    "Primario (completo)",
    "Primario (abandonado)",
    "Secundario (en curso)",
    "Secundario (completo)",
    "Secundario (abandonado)",
    "Terciario (en curso)",
    "Terciario (completo)",
    "Terciario (abandonado)",
    "Universitario (en curso)",
    "Universitario (completo)",
    "Universitario (abandonado)",
    "Posgrado (en curso)",
    "Posgrado (completo)",
    "Posgrado (abandonado)",
];
