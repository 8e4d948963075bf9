use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;
use warden_authz::Decision;

use crate::{
    error::{ApiError, Result},
    middleware::RequestId,
    models::{AuthorizeRequest, HealthResponse, ResolveRequest},
    state::AppState,
};

/// Prometheus text exposition content type
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Engine metrics in Prometheus text format
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let collector = state
        .engine
        .metrics()
        .ok_or_else(|| ApiError::NotFound("metrics are disabled".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        collector.export_prometheus().await,
    ))
}

/// Authorize an HTTP method and path for the calling user
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    headers: HeaderMap,
    Json(req): Json<AuthorizeRequest>,
) -> Result<(StatusCode, Json<Decision>)> {
    let Some(user_id) = state.user_id(&headers) else {
        warn!(%request_id, header = %state.user_header, "missing user identity");
        return Ok(unauthenticated());
    };

    req.validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let decision = state
        .engine
        .authorize_http(&user_id, &req.method, &req.path)
        .await?;

    info!(
        %request_id,
        decision_id = %decision.id,
        user_id = %decision.user_id,
        method = %req.method,
        path = %req.path,
        outcome = ?decision.outcome,
        "authorization decided"
    );

    Ok(respond(decision))
}

/// Resolve a domain action and resource for the calling user
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    headers: HeaderMap,
    Json(req): Json<ResolveRequest>,
) -> Result<(StatusCode, Json<Decision>)> {
    let Some(user_id) = state.user_id(&headers) else {
        warn!(%request_id, header = %state.user_header, "missing user identity");
        return Ok(unauthenticated());
    };

    req.validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let decision = state
        .engine
        .authorize(&user_id, &req.action, &req.resource)
        .await?;

    info!(
        %request_id,
        decision_id = %decision.id,
        user_id = %decision.user_id,
        action = %req.action,
        resource = %req.resource,
        outcome = ?decision.outcome,
        "authorization decided"
    );

    Ok(respond(decision))
}

fn respond(decision: Decision) -> (StatusCode, Json<Decision>) {
    let status = StatusCode::from_u16(decision.status_code()).unwrap_or(StatusCode::FORBIDDEN);
    (status, Json(decision))
}

fn unauthenticated() -> (StatusCode, Json<Decision>) {
    (StatusCode::UNAUTHORIZED, Json(Decision::unauthenticated()))
}
