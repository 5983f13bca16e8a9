pub mod get_data;
pub mod get_fasta;
pub mod get_md_worklist;

pub use get_data::GetProjectDataQuery;
pub use get_fasta::GetProjectFastaQuery;
pub use get_md_worklist::GetMdWorklistQuery;

use super::store::ProjectError;
use crate::features::shared::validation::{validate_identifier, MAX_IDENTIFIER_LENGTH};

fn check_project_id(project_id: &str) -> Result<(), ProjectError> {
    validate_identifier(project_id, MAX_IDENTIFIER_LENGTH).map_err(|e| {
        ProjectError::InvalidIdentifier {
            project_id: project_id.to_string(),
            reason: e.to_string(),
        }
    })
}
