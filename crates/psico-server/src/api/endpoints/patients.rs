//! Patient endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use psico_core::{Patient, PatientPayload, MSG_PATIENT_NOT_FOUND};

use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::types::{parse_id, ApiContext, OkResponse};

/// `GET /pacientes`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = ctx.run(|core| core.list_patients()).await?;
    Ok(Json(patients))
}

/// `GET /pacientes/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id, MSG_PATIENT_NOT_FOUND)?;
    let patient = ctx.run(move |core| core.get_patient(id)).await?;
    Ok(Json(patient))
}

/// `POST /pacientes`
pub async fn create(
    State(ctx): State<ApiContext>,
    JsonBody(payload): JsonBody<PatientPayload>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = ctx.run(move |core| core.create_patient(&payload)).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `PUT /pacientes/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<PatientPayload>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id, MSG_PATIENT_NOT_FOUND)?;
    let patient = ctx.run(move |core| core.update_patient(id, &payload)).await?;
    Ok(Json(patient))
}

/// `DELETE /pacientes/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = parse_id(&id, MSG_PATIENT_NOT_FOUND)?;
    ctx.run(move |core| core.delete_patient(id)).await?;
    Ok(Json(OkResponse::ok()))
}
