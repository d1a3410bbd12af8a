//! Reference list payload rules.

use super::{text, ValidationErrors};
use crate::models::{ReferenceList, ReferencePayload};

/// Validate a reference-list entry, returning its trimmed name.
pub fn validate_reference(
    list: ReferenceList,
    payload: &ReferencePayload,
) -> Result<String, ValidationErrors> {
    let name = text(&payload.name);
    if name.is_empty() {
        return Err(ValidationErrors::single("nombre", list.missing_name_message()));
    }
    Ok(name)
}
