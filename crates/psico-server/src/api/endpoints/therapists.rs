//! Therapist account management. Admin only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use psico_core::{Therapist, TherapistPayload, MSG_THERAPIST_NOT_FOUND};

use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::types::{parse_id, ApiContext, OkResponse};

/// `GET /terapeutas`. Password hashes never leave the core.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Therapist>>, ApiError> {
    let therapists = ctx.run(|core| core.list_therapists()).await?;
    Ok(Json(therapists))
}

/// `GET /terapeutas/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Therapist>, ApiError> {
    let id = parse_id(&id, MSG_THERAPIST_NOT_FOUND)?;
    let therapist = ctx.run(move |core| core.get_therapist(id)).await?;
    Ok(Json(therapist))
}

/// `POST /terapeutas`
pub async fn create(
    State(ctx): State<ApiContext>,
    JsonBody(payload): JsonBody<TherapistPayload>,
) -> Result<(StatusCode, Json<Therapist>), ApiError> {
    let therapist = ctx.run(move |core| core.create_therapist(&payload)).await?;
    Ok((StatusCode::CREATED, Json(therapist)))
}

/// `PUT /terapeutas/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TherapistPayload>,
) -> Result<Json<Therapist>, ApiError> {
    let id = parse_id(&id, MSG_THERAPIST_NOT_FOUND)?;
    let therapist = ctx
        .run(move |core| core.update_therapist(id, &payload))
        .await?;
    Ok(Json(therapist))
}

/// `DELETE /terapeutas/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = parse_id(&id, MSG_THERAPIST_NOT_FOUND)?;
    ctx.run(move |core| core.delete_therapist(id)).await?;
    Ok(Json(OkResponse::ok()))
}
