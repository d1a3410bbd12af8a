//! Therapist login.

use axum::extract::State;
use axum::Json;
use psico_core::{LoginPayload, Therapist};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub token: String,
    pub terapeuta: Therapist,
}

/// `POST /login-terapeuta`
///
/// Wrong password and unknown user produce the same 401 body.
pub async fn login(
    State(ctx): State<ApiContext>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let therapist = ctx.run(move |core| core.authenticate(&payload)).await?;
    let token = ctx
        .tokens
        .issue(&therapist)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        ok: true,
        token,
        terapeuta: therapist,
    }))
}
