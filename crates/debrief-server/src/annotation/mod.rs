//! UniProt / PDB Annotation Module
//!
//! Turns a UniProt accession into an enriched annotation record:
//! - Fetch: one UniProtKB query for the sequence, PDB cross-references and
//!   secondary-structure features of the entry
//! - Resolve: one RCSB FASTA download per cross-referenced structure, reshaped
//!   into a chain -> sequence mapping
//! - Parse: the beta strand / helix / turn feature strings become range records
//!
//! Data sources:
//! - UniProtKB search: <https://rest.uniprot.org/uniprotkb/search> (TSV)
//! - RCSB FASTA: `https://www.rcsb.org/fasta/entry/{id}/download`

pub mod config;
pub mod http;
pub mod models;
pub mod pdb;
pub mod pipeline;
pub mod secondary_structure;
pub mod uniprot;

pub use config::{AnnotationConfig, FailurePolicy};
pub use http::HttpFetcher;
pub use models::{
    AnnotationField, ResultRecord, SecondaryStructureRange, StructureOutcome, StructureRecord,
};
pub use pdb::{RcsbRepository, StructureRepository, StructureResolver};
pub use pipeline::{AnnotationPipeline, PipelineSettings};
pub use secondary_structure::{parse_annotation, ClauseError, ClauseErrorKind};
pub use uniprot::{AnnotationService, UniProtClient};

/// Result type for annotation operations
pub type Result<T> = std::result::Result<T, AnnotationError>;

/// Error types for the annotation pipeline
///
/// Every variant that concerns an upstream object carries its identifier in
/// `target` (entry accession or structure id).
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("Invalid identifier '{target}': {reason}")]
    InvalidIdentifier { target: String, reason: String },

    #[error("Request for '{target}' failed: {message}")]
    Network { target: String, message: String },

    #[error("No record found for '{target}'")]
    Lookup { target: String },

    #[error("Could not parse '{field}' of '{target}': {source}")]
    Parse {
        target: String,
        field: String,
        #[source]
        source: ClauseError,
    },

    #[error("Malformed data for '{target}': {message}")]
    Format { target: String, message: String },

    #[error("Annotation of '{target}' did not finish within {secs} seconds")]
    Timeout { target: String, secs: u64 },

    #[error("IO error while handling '{target}': {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnnotationError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AnnotationError::InvalidIdentifier { .. } => "BAD_REQUEST",
            AnnotationError::Network { .. } => "NETWORK_ERROR",
            AnnotationError::Lookup { .. } => "NOT_FOUND",
            AnnotationError::Parse { .. } => "PARSE_ERROR",
            AnnotationError::Format { .. } => "FORMAT_ERROR",
            AnnotationError::Timeout { .. } => "TIMEOUT",
            AnnotationError::Io { .. }
            | AnnotationError::Serialization(_)
            | AnnotationError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The entry or structure id the error is about, when there is one
    pub fn target(&self) -> Option<&str> {
        match self {
            AnnotationError::InvalidIdentifier { target, .. }
            | AnnotationError::Network { target, .. }
            | AnnotationError::Lookup { target }
            | AnnotationError::Parse { target, .. }
            | AnnotationError::Format { target, .. }
            | AnnotationError::Timeout { target, .. }
            | AnnotationError::Io { target, .. } => Some(target),
            AnnotationError::Serialization(_) | AnnotationError::Internal(_) => None,
        }
    }

    pub fn network(target: &str, message: impl Into<String>) -> Self {
        AnnotationError::Network {
            target: target.to_string(),
            message: message.into(),
        }
    }

    pub fn lookup(target: &str) -> Self {
        AnnotationError::Lookup {
            target: target.to_string(),
        }
    }

    pub fn format(target: &str, message: impl Into<String>) -> Self {
        AnnotationError::Format {
            target: target.to_string(),
            message: message.into(),
        }
    }
}
