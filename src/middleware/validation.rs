use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::AppConfig;
use crate::error::AppError;

/// Rejects requests before routing when the URI tries to escape the resource
/// tree or the announced body exceeds `server.max_body_bytes`.
pub async fn validate_request_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    if contains_path_traversal(req.uri().path()) {
        tracing::warn!("Rejected request with traversal sequence: {}", sanitize_for_logging(req.uri().path()));
        return AppError::BadRequest("Path traversal detected in request".to_string()).into_response();
    }

    if matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH) {
        let length = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        let max = cfg.server.max_body_bytes;
        if let Some(length) = length.filter(|l| *l > max) {
            tracing::debug!("Rejected body of {} bytes", length);
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                    "status": 413,
                    "error": "Payload Too Large",
                    "code": "PAYLOAD_TOO_LARGE",
                    "message": format!("Request body exceeds maximum size of {} bytes", max),
                })),
            )
                .into_response();
        }
    }

    next.run(req).await
}

/// Dot segments (plain or percent-encoded) and NUL bytes.
fn contains_path_traversal(path: &str) -> bool {
    let lower = path.to_lowercase();

    if path.contains("/..") || path.contains("\\..") || path.starts_with("..") {
        return true;
    }
    if path.contains("/./") || path.ends_with("/.") {
        return true;
    }

    const ENCODED: [&str; 7] = ["%2e%2e", "%252e%252e", "%2e/", "/%2e", "%2f%2e", "%5c", "%00"];
    if ENCODED.iter().any(|p| lower.contains(p)) {
        return true;
    }

    path.contains('\0')
}

/// Strips control characters and bounds the length of client input before logging.
pub fn sanitize_for_logging(input: &str) -> String {
    input.chars().filter(|c| !c.is_control()).take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_traversal_detection() {
        assert!(contains_path_traversal("/api/../etc/passwd"));
        assert!(contains_path_traversal("/api/contacts/./1"));
        assert!(contains_path_traversal("/api/%2e%2e/contacts"));
        assert!(contains_path_traversal("/api/contacts%00"));

        assert!(!contains_path_traversal("/api/contacts/1"));
        assert!(!contains_path_traversal("/api/production-installations/search/findAllByName"));
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(sanitize_for_logging("/api/contacts"), "/api/contacts");
        assert_eq!(sanitize_for_logging("a\nb\x00c"), "abc");
        assert_eq!(sanitize_for_logging(&"x".repeat(300)).len(), 200);
    }
}
