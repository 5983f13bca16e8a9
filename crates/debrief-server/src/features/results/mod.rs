//! Annotation results
//!
//! `GET /result/:id` runs the annotation pipeline for one UniProt entry.

pub mod queries;
pub mod routes;

pub use queries::GetResultQuery;
pub use routes::results_routes;
