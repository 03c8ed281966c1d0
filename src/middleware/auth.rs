use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::config::AppConfig;
use crate::error::AppError;

/// Requires `Authorization: Bearer <security.api_token>` when a token is configured.
///
/// Without a token the middleware is a no-op. Only the resource routes are
/// wrapped; health and metrics stay open for probes.
pub async fn auth_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = cfg.api_token() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if constant_time_eq(token.trim().as_bytes(), expected.as_bytes()) => Ok(next.run(req).await),
        Some(_) => Err(AppError::Unauthorized("Invalid bearer token".to_string())),
        None => Err(AppError::Unauthorized("Missing bearer token".to_string())),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
