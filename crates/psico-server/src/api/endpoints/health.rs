//! Liveness check.

use axum::Json;

use crate::api::types::OkResponse;

/// `GET /health`, unauthenticated.
pub async fn check() -> Json<OkResponse> {
    Json(OkResponse::ok())
}
