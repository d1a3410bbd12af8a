//! Extractors whose rejections use the API error body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, MSG_INVALID_BODY, MSG_INVALID_QUERY};

/// JSON request body. A missing content type or malformed JSON is a 400.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                let rejection: JsonRejection = rejection;
                tracing::debug!(reason = %rejection.body_text(), "rejected request body");
                Err(ApiError::BadRequest(MSG_INVALID_BODY.to_string()))
            }
        }
    }
}

/// Query string parameters. Unparseable values are a 400.
pub struct QueryParams<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => {
                let rejection: QueryRejection = rejection;
                tracing::debug!(reason = %rejection.body_text(), "rejected query string");
                Err(ApiError::BadRequest(MSG_INVALID_QUERY.to_string()))
            }
        }
    }
}
