//! Error types for moviexml-common.

use thiserror::Error;

/// Common error type for moviexml operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Name does not match any entity kind.
    #[error("unknown entity kind: {0:?} (expected movie, person or oscar)")]
    UnknownKind(String),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
