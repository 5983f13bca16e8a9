//! DEbrief Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error types, logging setup and sequence file handling for the
//! DEbrief workspace.
//!
//! - **Error Handling**: [`DebriefError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber configuration ([`logging`])
//! - **FASTA**: reading and writing of FASTA records ([`fasta`])
//!
//! # Example
//!
//! ```
//! use debrief_common::fasta;
//!
//! let records = fasta::parse_str(">1ABC:A|PDBID|CHAIN|SEQUENCE\nMKV\nLA\n").unwrap();
//! assert_eq!(records[0].sequence, "MKVLA");
//! ```

pub mod error;
pub mod fasta;
pub mod logging;

pub use error::{DebriefError, Result};
