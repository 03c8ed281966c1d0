use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::time::Duration;

const READY_TIMEOUT: Duration = Duration::from_secs(5);

// Liveness probe, never touches the database
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: database reachable and schema in place, bounded by a timeout
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1 FROM production_installations LIMIT 1").fetch_optional(&state.db);
    match tokio::time::timeout(READY_TIMEOUT, query).await {
        Ok(Ok(_)) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP installation_registry_resources_created Resources created\n# TYPE installation_registry_resources_created counter\ninstallation_registry_resources_created {}\n\
# HELP installation_registry_resources_updated Resources updated\n# TYPE installation_registry_resources_updated counter\ninstallation_registry_resources_updated {}\n\
# HELP installation_registry_resources_deleted Resources deleted\n# TYPE installation_registry_resources_deleted counter\ninstallation_registry_resources_deleted {}\n\
# HELP installation_registry_validation_failures Rejected request bodies\n# TYPE installation_registry_validation_failures counter\ninstallation_registry_validation_failures {}\n\
# HELP installation_registry_search_queries Search queries served\n# TYPE installation_registry_search_queries counter\ninstallation_registry_search_queries {}\n\
# HELP installation_registry_uptime_seconds Uptime seconds\n# TYPE installation_registry_uptime_seconds gauge\ninstallation_registry_uptime_seconds {}\n",
        m.resources_created,
        m.resources_updated,
        m.resources_deleted,
        m.validation_failures,
        m.search_queries,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version(State(state): State<AppState>) -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "api": {
            "base_path": state.config.rest.base_path,
            "media_type": crate::hal::HAL_JSON,
        },
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
