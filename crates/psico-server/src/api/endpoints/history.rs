//! History entry endpoints. Append-only: no update or delete routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use psico_core::{HistoryEntry, HistoryFilter, HistoryPayload, MSG_HISTORY_NOT_FOUND};

use crate::api::error::ApiError;
use crate::api::extract::{JsonBody, QueryParams};
use crate::api::types::{parse_id, ApiContext};

/// `GET /historiales?pacienteId=&terapeutaId=&tipoRegistro=`, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    QueryParams(filter): QueryParams<HistoryFilter>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let entries = ctx.run(move |core| core.list_history(&filter)).await?;
    Ok(Json(entries))
}

/// `GET /historiales/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let id = parse_id(&id, MSG_HISTORY_NOT_FOUND)?;
    let entry = ctx.run(move |core| core.get_history(id)).await?;
    Ok(Json(entry))
}

/// `POST /historiales`
pub async fn create(
    State(ctx): State<ApiContext>,
    JsonBody(payload): JsonBody<HistoryPayload>,
) -> Result<(StatusCode, Json<HistoryEntry>), ApiError> {
    let entry = ctx.run(move |core| core.create_history(&payload)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
