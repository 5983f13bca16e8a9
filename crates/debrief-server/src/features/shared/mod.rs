//! Shared utilities for feature modules
//!
//! - **validation**: Input validation utilities

pub mod validation;

pub use validation::{validate_identifier, IdentifierValidationError, MAX_IDENTIFIER_LENGTH};
