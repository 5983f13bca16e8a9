//! Shared validation utilities
//!
//! Identifiers arrive as path segments and are later embedded in upstream
//! query strings, URLs and `Content-Disposition` headers, so they are
//! restricted to a conservative character set.
//!
//! ```rust,ignore
//! use debrief_server::features::shared::validation::validate_identifier;
//!
//! validate_identifier("P12345", MAX_IDENTIFIER_LENGTH)?;
//! ```

use thiserror::Error;

/// Longest accepted identifier
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Errors that can occur during identifier validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierValidationError {
    #[error("Identifier is required and cannot be empty")]
    Required,

    #[error("Identifier must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },

    #[error("Identifier can only contain letters, numbers, '_', '-' and '.'")]
    InvalidFormat,
}

/// Validate an entry, structure or project identifier
///
/// # Rules
/// - Must not be empty
/// - Must not exceed `max_length` bytes
/// - ASCII letters, digits, `_`, `-` and `.` only
/// - Must start with a letter or digit
pub fn validate_identifier(id: &str, max_length: usize) -> Result<(), IdentifierValidationError> {
    if id.is_empty() {
        return Err(IdentifierValidationError::Required);
    }

    if id.len() > max_length {
        return Err(IdentifierValidationError::TooLong { max_length });
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    let valid_start = id.starts_with(|c: char| c.is_ascii_alphanumeric());

    if !valid_chars || !valid_start {
        return Err(IdentifierValidationError::InvalidFormat);
    }

    Ok(())
}
