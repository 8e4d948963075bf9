//! Error types for the permission resolution engine

use thiserror::Error;

/// Permission engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// HTTP method outside GET/POST/PUT/PATCH/DELETE
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Resource identifier could not be canonicalized
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// Resource has more segments than the configured bound
    #[error("Resource depth {depth} exceeds maximum of {max}")]
    ResourceTooDeep { depth: usize, max: usize },

    /// Invalid input (unknown action or effect names, malformed records)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Permission store failed to answer a query
    #[error("Permission store unavailable: {0}")]
    StoreUnavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthzError {
    /// Whether the error stems from a malformed request rather than an
    /// operational fault. Callers map the former to a 4xx response.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMethod(_)
                | Self::InvalidResource(_)
                | Self::ResourceTooDeep { .. }
                | Self::InvalidInput(_)
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthzError::UnsupportedMethod("OPTIONS".to_string());
        assert_eq!(err.to_string(), "Unsupported method: OPTIONS");

        let err = AuthzError::ResourceTooDeep { depth: 20, max: 16 };
        assert_eq!(err.to_string(), "Resource depth 20 exceeds maximum of 16");
    }

    #[test]
    fn test_client_errors() {
        assert!(AuthzError::UnsupportedMethod("TRACE".into()).is_client_error());
        assert!(AuthzError::InvalidResource("a//b".into()).is_client_error());
        assert!(AuthzError::ResourceTooDeep { depth: 3, max: 2 }.is_client_error());

        assert!(!AuthzError::StoreUnavailable("connection refused".into()).is_client_error());
        assert!(!AuthzError::DatabaseError("timeout".into()).is_client_error());
        assert!(!AuthzError::Internal("bug".into()).is_client_error());
    }
}
