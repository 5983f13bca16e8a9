//! Feature modules implementing the DEbrief API
//!
//! Each feature is a vertical slice with its own queries and routes.
//!
//! # Features
//!
//! - **results**: UniProt entry annotation enriched with PDB structures
//! - **projects**: viewer data, FASTA and MD worklist exports per project
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions

pub mod projects;
pub mod results;
pub mod shared;

use axum::Router;
use std::sync::Arc;

use crate::annotation::AnnotationPipeline;
use projects::ProjectStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Annotation pipeline behind `/result`
    pub pipeline: Arc<AnnotationPipeline>,
    /// Read-only project data behind the export routes
    pub projects: Arc<dyn ProjectStore>,
}

/// Creates the feature router
///
/// - `/result/:id` - annotation of one UniProt entry
/// - `/data/:project_id`, `/fasta/:project_id`, `/md-worklist/:project_id` - project exports
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/result", results::results_routes().with_state(state.pipeline))
        .merge(projects::projects_routes().with_state(state.projects))
}
