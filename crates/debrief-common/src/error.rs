//! Error types shared across DEbrief crates

use thiserror::Error;

/// Result type alias for DEbrief operations
pub type Result<T> = std::result::Result<T, DebriefError>;

#[derive(Error, Debug)]
pub enum DebriefError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed sequence file
    #[error("Malformed FASTA: {0}")]
    Fasta(String),
}
