//! Route definitions for the API server
//!
//! - Health and metrics endpoints
//! - Authorization checks under `/v1`

use crate::{handlers, middleware, state::AppState, API_VERSION};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/authorize", post(handlers::authorize))
        .route("/resolve", post(handlers::resolve));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .nest(&format!("/{}", API_VERSION), api_routes)
        .with_state(state)
        // Middleware layers (executed bottom to top)
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
}
