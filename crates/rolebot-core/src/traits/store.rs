//! Durable storage for reaction-role bindings

use std::path::PathBuf;

use thiserror::Error;

use crate::entities::Binding;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Binding table not found at {}", path.display())]
    Missing { path: PathBuf },

    #[error("Binding table at {} is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode binding table: {0}")]
    Encode(String),
}

/// Full-table binding storage.
///
/// There is no incremental update: `save` replaces the whole table and must
/// do so atomically, so a crash mid-write never leaves a half-written table
/// behind. Implementations are blocking; callers run them off the async
/// executor.
pub trait BindingStore: Send + Sync {
    /// Read every binding, in stored order
    fn load(&self) -> StoreResult<Vec<Binding>>;

    /// Replace the stored table with `bindings`
    fn save(&self, bindings: &[Binding]) -> StoreResult<()>;
}
