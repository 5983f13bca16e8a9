use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationError, AnnotationPipeline, ResultRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResultQuery {
    /// UniProt accession
    pub id: String,
}

#[tracing::instrument(skip(pipeline))]
pub async fn handle(
    pipeline: &AnnotationPipeline,
    query: GetResultQuery,
) -> Result<ResultRecord, AnnotationError> {
    pipeline.get_result(query.id.trim()).await
}
