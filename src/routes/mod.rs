//! HTTP route handlers and the router that wires them up.
//!
//! - `root`: API entry point
//! - `contacts`: the contact collection and items
//! - `installations`: production installations and their contact association
//! - `search`: derived queries over production installations
//! - `health`: probes, metrics and version

pub mod contacts;
pub mod health;
pub mod installations;
pub mod root;
pub mod search;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, FromRequestParts, Path, Query,
    },
    http::request::Parts,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::{auth, security_headers, validation},
    model::Violations,
    state::AppState,
};

/// Builds the complete application: resource routes below `rest.base_path`,
/// health routes at the root, and the middleware stack.
pub fn build_router(state: AppState) -> Router {
    let cfg = state.config.clone();
    let base = match cfg.rest.base_path.as_str() {
        "/" => "",
        b => b,
    };
    let path = |suffix: &str| format!("{}{}", base, suffix);
    let root_path = if base.is_empty() { "/".to_string() } else { base.to_string() };

    let api = Router::new()
        .route(&root_path, get(root::api_root))
        .route(&path("/contacts"), get(contacts::list_contacts).post(contacts::create_contact))
        .route(
            &path("/contacts/{id}"),
            get(contacts::get_contact)
                .put(contacts::replace_contact)
                .patch(contacts::patch_contact)
                .delete(contacts::delete_contact),
        )
        .route(
            &path("/production-installations"),
            get(installations::list_installations).post(installations::create_installation),
        )
        .route(&path("/production-installations/search"), get(search::search_index))
        .route(&path("/production-installations/search/findAllByName"), get(search::find_all_by_name))
        .route(
            &path("/production-installations/search/findAllByOutputPowerBetween"),
            get(search::find_all_by_output_power_between),
        )
        .route(
            &path("/production-installations/{id}"),
            get(installations::get_installation)
                .put(installations::replace_installation)
                .patch(installations::patch_installation)
                .delete(installations::delete_installation),
        )
        .route(
            &path("/production-installations/{id}/contact"),
            get(installations::get_installation_contact)
                .put(installations::put_installation_contact)
                .delete(installations::delete_installation_contact),
        )
        .route_layer(from_fn_with_state(cfg.clone(), auth::auth_middleware));

    let probes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version));

    let app = api
        .merge(probes)
        .fallback(|| async { AppError::NotFound("No resource at this path".to_string()) })
        .with_state(state)
        .layer(DefaultBodyLimit::max(cfg.server.max_body_bytes))
        .layer(from_fn_with_state(cfg.clone(), validation::validate_request_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg, security_headers::security_headers_middleware));

    // Permissive CORS only for local development against a separate client
    if cfg!(debug_assertions) {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Positive numeric id from the `{id}` path segment; anything else is a 404.
pub struct ResourceId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for ResourceId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Resource not found".to_string()))?;
        raw.parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(ResourceId)
            .ok_or_else(|| AppError::NotFound(format!("No resource with id '{}'", raw)))
    }
}

/// Unwraps a JSON body, turning axum's rejection into our error body.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(AppError::UnsupportedMediaType(
            "Expected Content-Type application/json or application/hal+json".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(e.body_text())),
    }
}

/// Unwraps query parameters; a malformed query string is a JSON bad request.
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query.map(|Query(value)| value).map_err(|e| AppError::BadRequest(e.body_text()))
}

pub(crate) fn validated<T>(state: &AppState, result: Result<T, Violations>) -> AppResult<T> {
    result.map_err(|violations| {
        state.metrics.inc_validation_failures();
        AppError::Validation(violations)
    })
}
