use debrief_common::fasta;

use super::check_project_id;
use crate::features::projects::store::{ProjectError, ProjectStore};

#[derive(Debug, Clone)]
pub struct GetProjectFastaQuery {
    pub project_id: String,
}

impl GetProjectFastaQuery {
    pub fn validate(&self) -> Result<(), ProjectError> {
        check_project_id(&self.project_id)
    }
}

/// The project's sequences as FASTA text, ordered by sequence id
#[tracing::instrument(skip(store))]
pub async fn handle(
    store: &dyn ProjectStore,
    query: GetProjectFastaQuery,
) -> Result<String, ProjectError> {
    query.validate()?;

    let sequences = store.sequences(&query.project_id).await?;

    fasta::to_string(sequences.iter().map(|(id, seq)| (id.as_str(), seq.as_str()))).map_err(|e| {
        ProjectError::Render {
            project_id: query.project_id.clone(),
            message: e.to_string(),
        }
    })
}
