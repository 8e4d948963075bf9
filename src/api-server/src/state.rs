use axum::http::{header::InvalidHeaderName, HeaderMap, HeaderName};
use std::sync::Arc;
use std::time::Instant;
use warden_authz::PermissionEngine;

/// Header carrying the authenticated user id when none is configured
pub const DEFAULT_USER_HEADER: &str = "x-user-id";

/// Application state shared across handlers
pub struct AppState {
    /// Permission resolution engine
    pub engine: Arc<PermissionEngine>,

    /// Header set by the upstream authentication layer
    pub user_header: HeaderName,

    /// Server start time for uptime calculation
    pub start_time: Instant,

    pub version: String,
}

impl AppState {
    pub fn new(engine: PermissionEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            user_header: HeaderName::from_static(DEFAULT_USER_HEADER),
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Read the user id from a different header
    pub fn with_user_header(mut self, name: &str) -> Result<Self, InvalidHeaderName> {
        self.user_header = HeaderName::try_from(name)?;
        Ok(self)
    }

    /// Authenticated user id, if the upstream layer supplied a usable one
    pub fn user_id(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.user_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
