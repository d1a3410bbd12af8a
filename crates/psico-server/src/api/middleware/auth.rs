//! Bearer token authentication and admin authorization middleware.
//!
//! `require_auth` verifies `Authorization: Bearer <token>` and injects an
//! [`AuthContext`] into request extensions. `require_admin` runs after it and
//! rejects callers whose token lacks the admin flag.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use psico_core::AuthError;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthContext};

/// Require a valid, unexpired session token.
pub async fn require_auth(State(ctx): State<ApiContext>, req: Request, next: Next) -> Response {
    match require_auth_inner(&ctx, req).await {
        Ok(req) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(ctx: &ApiContext, mut req: Request) -> Result<Request, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let claims = ctx.tokens.verify(token).map_err(|e| {
        match e {
            AuthError::TokenExpired => tracing::debug!("rejected expired token"),
            _ => tracing::warn!("rejected invalid token"),
        }
        ApiError::InvalidToken
    })?;

    req.extensions_mut().insert(AuthContext {
        therapist: claims.therapist(),
    });
    Ok(req)
}

/// Require the admin flag. Must be layered inside [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Response {
    let caller = req
        .extensions()
        .get::<AuthContext>()
        .map(|auth| (auth.therapist.id, auth.therapist.is_admin));

    match caller {
        Some((_, true)) => next.run(req).await,
        Some((therapist_id, false)) => {
            tracing::warn!(therapist_id, "non-admin denied");
            ApiError::Forbidden.into_response()
        }
        None => ApiError::Unauthorized.into_response(),
    }
}
