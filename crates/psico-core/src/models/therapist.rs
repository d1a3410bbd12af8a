//! Therapist account models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public view of a therapist account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Therapist {
    pub id: i64,
    #[serde(rename = "usuario")]
    pub username: String,
    /// Grants therapist-account management rights
    #[serde(rename = "esAdmin")]
    pub is_admin: bool,
}

/// Stored therapist row including the Argon2 PHC hash.
///
/// Only the login path reads this. Not `Serialize`.
#[derive(Debug, Clone)]
pub struct TherapistCredentials {
    pub therapist: Therapist,
    pub password_hash: String,
}

/// Normalized therapist fields ready to be hashed and persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TherapistDraft {
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

/// Raw therapist create/update request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TherapistPayload {
    #[serde(rename = "usuario")]
    pub username: Option<Value>,
    #[serde(rename = "contrasenia")]
    pub password: Option<Value>,
    #[serde(rename = "esAdmin")]
    pub is_admin: Option<Value>,
}

/// Raw login request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    #[serde(rename = "usuario")]
    pub username: Option<Value>,
    #[serde(rename = "contrasenia")]
    pub password: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_view_has_no_password_field() {
        let therapist = Therapist {
            id: 1,
            username: "admin".into(),
            is_admin: true,
        };
        let value = serde_json::to_value(&therapist).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(value["usuario"], "admin");
        assert_eq!(value["esAdmin"], true);
        assert!(!object.contains_key("contrasenia"));
    }
}
