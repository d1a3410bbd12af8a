//! Therapist account and login payload rules.

use super::{flag, text, ValidationErrors};
use crate::models::{LoginPayload, TherapistDraft, TherapistPayload};

pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_USERNAME_EMPTY: &str = "El usuario es obligatorio";
pub const MSG_PASSWORD_EMPTY: &str = "La contraseña es obligatoria";
pub const MSG_PASSWORD_TOO_SHORT: &str = "La contraseña debe tener al menos 6 caracteres";
pub const MSG_CREDENTIALS_REQUIRED: &str = "Usuario y contraseña son obligatorios";

/// Validate a therapist create/update payload.
pub fn validate_therapist(payload: &TherapistPayload) -> Result<TherapistDraft, ValidationErrors> {
    let draft = TherapistDraft {
        username: text(&payload.username),
        password: text(&payload.password),
        is_admin: flag(&payload.is_admin),
    };

    let mut errors = ValidationErrors::new();
    if draft.username.is_empty() {
        errors.push("usuario", MSG_USERNAME_EMPTY);
    }
    if draft.password.is_empty() {
        errors.push("contrasenia", MSG_PASSWORD_EMPTY);
    } else if draft.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("contrasenia", MSG_PASSWORD_TOO_SHORT);
    }

    errors.into_result(draft)
}

/// Validate a login payload. Only presence is checked, so the password policy
/// is not revealed to unauthenticated callers.
pub fn validate_login(payload: &LoginPayload) -> Result<(String, String), ValidationErrors> {
    let username = text(&payload.username);
    let password = text(&payload.password);
    if username.is_empty() || password.is_empty() {
        return Err(ValidationErrors::single("usuario", MSG_CREDENTIALS_REQUIRED));
    }
    Ok((username, password))
}
