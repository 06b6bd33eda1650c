//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use rolebot_core::{DomainError, PlatformError, StoreError};
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or expected not-found outcome
    Domain(DomainError),

    /// Binding table could not be read at startup
    StoreLoad(StoreError),

    /// Binding table write failed; the mutation was not committed
    StoreWrite(StoreError),

    /// Platform call failed
    Platform(PlatformError),

    /// Validation error
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::StoreLoad(e) => write!(f, "Failed to load bindings: {e}"),
            Self::StoreWrite(e) => write!(f, "Failed to save bindings: {e}"),
            Self::Platform(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::StoreLoad(e) | Self::StoreWrite(e) => Some(e),
            Self::Platform(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is an expected "nothing matched" outcome
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::StoreLoad(_) => "STORE_LOAD_ERROR",
            Self::StoreWrite(_) => "STORE_WRITE_ERROR",
            Self::Platform(PlatformError::Forbidden(_)) => "PLATFORM_FORBIDDEN",
            Self::Platform(_) => "PLATFORM_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PlatformError> for ServiceError {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rolebot_core::Snowflake;
    use std::path::PathBuf;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::from(DomainError::NoBindingsForRole(Snowflake::new(7)));
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "UNKNOWN_REACTION_ROLE");
    }

    #[test]
    fn test_store_write_error() {
        let err = ServiceError::StoreWrite(StoreError::Missing {
            path: PathBuf::from("files/reactionroles.json"),
        });
        assert!(!err.is_not_found());
        assert_eq!(err.error_code(), "STORE_WRITE_ERROR");
        assert!(err.to_string().starts_with("Failed to save bindings"));
    }

    #[test]
    fn test_platform_error_codes() {
        let err = ServiceError::from(PlatformError::Forbidden("hierarchy".to_string()));
        assert_eq!(err.error_code(), "PLATFORM_FORBIDDEN");

        let err = ServiceError::from(PlatformError::Timeout);
        assert_eq!(err.error_code(), "PLATFORM_ERROR");
    }
}
