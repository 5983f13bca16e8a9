//! Project exports
//!
//! Read-only views of stored projects: the viewer data document, the
//! designed sequences as FASTA and the MD worklist.

pub mod queries;
pub mod routes;
pub mod store;

pub use queries::{GetMdWorklistQuery, GetProjectDataQuery, GetProjectFastaQuery};
pub use routes::projects_routes;
pub use store::{JsonProjectStore, ProjectError, ProjectRecord, ProjectStore};
