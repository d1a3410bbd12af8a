//! Reference list endpoints (`/tipos-registro`, `/niveles-educativos`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use psico_core::{ReferenceItem, ReferenceList, ReferencePayload};

use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::types::ApiContext;

async fn list(ctx: ApiContext, list: ReferenceList) -> Result<Json<Vec<ReferenceItem>>, ApiError> {
    let items = ctx.run(move |core| core.list_reference(list)).await?;
    Ok(Json(items))
}

async fn create(
    ctx: ApiContext,
    list: ReferenceList,
    payload: ReferencePayload,
) -> Result<(StatusCode, Json<ReferenceItem>), ApiError> {
    let item = ctx
        .run(move |core| core.create_reference(list, &payload))
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_record_types(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<ReferenceItem>>, ApiError> {
    list(ctx, ReferenceList::RecordTypes).await
}

pub async fn create_record_type(
    State(ctx): State<ApiContext>,
    JsonBody(payload): JsonBody<ReferencePayload>,
) -> Result<(StatusCode, Json<ReferenceItem>), ApiError> {
    create(ctx, ReferenceList::RecordTypes, payload).await
}

pub async fn list_education_levels(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<ReferenceItem>>, ApiError> {
    list(ctx, ReferenceList::EducationLevels).await
}

pub async fn create_education_level(
    State(ctx): State<ApiContext>,
    JsonBody(payload): JsonBody<ReferencePayload>,
) -> Result<(StatusCode, Json<ReferenceItem>), ApiError> {
    create(ctx, ReferenceList::EducationLevels, payload).await
}
