use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::queries::{get_result, GetResultQuery};
use crate::annotation::AnnotationPipeline;
use crate::error::AppError;

pub fn results_routes() -> Router<Arc<AnnotationPipeline>> {
    Router::new().route("/:id", get(get_result))
}

#[tracing::instrument(skip(pipeline))]
async fn get_result(
    State(pipeline): State<Arc<AnnotationPipeline>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let record = get_result::handle(&pipeline, GetResultQuery { id }).await?;

    tracing::info!(fields = record.len(), "Annotation complete");

    Ok((StatusCode::OK, Json(record)).into_response())
}
