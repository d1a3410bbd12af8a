//! API error type with status mapping and JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use psico_core::{ClinicError, ValidationErrors, MSG_INVALID_CREDENTIALS};
use serde::Serialize;

pub const MSG_TOKEN_REQUIRED: &str = "Token de autenticación requerido";
pub const MSG_TOKEN_INVALID: &str = "Token inválido o expirado";
pub const MSG_ADMIN_ONLY: &str = "Acceso restringido a administradores";
pub const MSG_INTERNAL: &str = "Error interno del servidor";
pub const MSG_INVALID_BODY: &str = "El cuerpo de la solicitud no es un JSON válido";
pub const MSG_INVALID_QUERY: &str = "Parámetros de consulta inválidos";

/// Error response body: `{"error": "..."}`, plus `detalles` for validation
/// failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalles: Option<ValidationErrors>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Admin role required")]
    Forbidden,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detalles) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, MSG_TOKEN_REQUIRED.to_string(), None),
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, MSG_TOKEN_INVALID.to_string(), None),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, MSG_ADMIN_ONLY.to_string(), None),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                MSG_INVALID_CREDENTIALS.to_string(),
                None,
            ),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, errors.to_string(), Some(errors)),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail, None),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail, None),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string(), None)
            }
        };

        (status, Json(ErrorBody { error, detalles })).into_response()
    }
}

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        match err {
            ClinicError::Validation(errors) => ApiError::Validation(errors),
            ClinicError::Conflict(message) => ApiError::BadRequest(message),
            ClinicError::NotFound(message) => ApiError::NotFound(message),
            ClinicError::InvalidCredentials => ApiError::InvalidCredentials,
            ClinicError::Database(detail) => ApiError::Internal(detail),
            ClinicError::Auth(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn validation_joins_messages_and_lists_details() {
        let mut errors = ValidationErrors::new();
        errors.push("nombre", "El nombre no debe estar vacío");
        errors.push("dni", "El DNI debe tener al menos 8 caracteres");

        let response = ApiError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "El nombre no debe estar vacío | El DNI debe tener al menos 8 caracteres"
        );
        assert_eq!(json["detalles"][1]["campo"], "dni");
        assert_eq!(json["detalles"][0]["mensaje"], "El nombre no debe estar vacío");
    }

    #[tokio::test]
    async fn plain_errors_have_no_details() {
        let response = ApiError::NotFound("Paciente no encontrado".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Paciente no encontrado");
        assert!(json.get("detalles").is_none());
    }

    #[tokio::test]
    async fn internal_hides_cause() {
        let response = ApiError::Internal("disk I/O error".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], MSG_INTERNAL);
    }

    #[tokio::test]
    async fn auth_failures_map_to_401_and_403() {
        assert_eq!(ApiError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn clinic_conflict_is_bad_request() {
        let err: ApiError = ClinicError::Conflict("El DNI ya se encuentra registrado".into()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "El DNI ya se encuentra registrado"));

        let err: ApiError = ClinicError::Database("locked".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
