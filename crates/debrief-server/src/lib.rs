//! DEbrief Server Library
//!
//! HTTP backend of the DEbrief protein design viewer.
//!
//! # Overview
//!
//! - **Annotation**: `GET /result/:id` fetches a UniProt entry, resolves each
//!   cross-referenced PDB structure into chain sequences and parses the
//!   beta strand / helix / turn features into residue ranges
//! - **Projects**: viewer data, FASTA and MD worklist exports
//! - **Static pages**: the viewer front end
//! - **Configuration**: environment-based, with `.env` support
//! - **Middleware**: CORS, compression and request tracing
//!
//! # Example
//!
//! ```no_run
//! use debrief_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let state = api::build_state(&config)?;
//!     api::serve(config, state).await?;
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use annotation::{AnnotationError, AnnotationPipeline, ResultRecord};
pub use error::AppError;
