//! Application router.
//!
//! Route groups, innermost layer first:
//! - admin: `/terapeutas*`, behind `require_admin`
//! - protected: patients, history, reference lists, plus the admin group,
//!   behind `require_auth`
//! - public: `/login-terapeuta`, `/health`
//!
//! Request tracing and CORS wrap every group.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware::auth::{require_admin, require_auth};
use crate::api::types::ApiContext;

/// Build the full API router.
///
/// An empty `cors_origins` allows any origin.
pub fn app_router(ctx: ApiContext, cors_origins: &[String]) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let admin = Router::new()
        .route(
            "/terapeutas",
            get(endpoints::therapists::list).post(endpoints::therapists::create),
        )
        .route(
            "/terapeutas/:id",
            get(endpoints::therapists::detail)
                .put(endpoints::therapists::update)
                .delete(endpoints::therapists::remove),
        )
        .route_layer(from_fn(require_admin));

    let protected = Router::new()
        .route(
            "/pacientes",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/pacientes/:id",
            get(endpoints::patients::detail)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/historiales",
            get(endpoints::history::list).post(endpoints::history::create),
        )
        .route("/historiales/:id", get(endpoints::history::detail))
        .route(
            "/tipos-registro",
            get(endpoints::reference::list_record_types)
                .post(endpoints::reference::create_record_type),
        )
        .route(
            "/niveles-educativos",
            get(endpoints::reference::list_education_levels)
                .post(endpoints::reference::create_education_level),
        )
        .merge(admin)
        .route_layer(from_fn_with_state(ctx.clone(), require_auth));

    let public = Router::new()
        .route("/login-terapeuta", post(endpoints::auth::login))
        .route("/health", get(endpoints::health::check));

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
