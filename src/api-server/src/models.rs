use serde::{Deserialize, Serialize};
use validator::Validate;

/// HTTP-vocabulary authorization request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthorizeRequest {
    /// HTTP method of the request being authorized
    #[validate(length(min = 1, max = 16))]
    pub method: String,

    /// Request path, optionally with a query string
    #[validate(length(max = 2048))]
    pub path: String,
}

/// Domain-vocabulary authorization request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResolveRequest {
    /// `read`, `write` or `delete`
    #[validate(length(min = 1, max = 16))]
    pub action: String,

    /// Slash-delimited resource identifier
    #[validate(length(max = 2048))]
    pub resource: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
