//! Gateway error types

use std::path::PathBuf;

use rolebot_core::StoreError;
use rolebot_service::ServiceError;
use thiserror::Error;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Binding store error: {0}")]
    Store(#[from] StoreError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Failed to read platform fixture {}: {source}", path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed platform fixture {}: {source}", path.display())]
    FixtureFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read events: {0}")]
    Source(#[from] std::io::Error),

    #[error("Task failed: {0}")]
    Task(String),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
