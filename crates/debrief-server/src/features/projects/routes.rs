//! Project API routes
//!
//! - `GET /data/:project_id` - mutations and PDB id as JSON
//! - `GET /fasta/:project_id` - sequences as a FASTA attachment
//! - `GET /md-worklist/:project_id` - tab-separated MD worklist attachment

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use super::queries::{
    get_data, get_fasta, get_md_worklist, GetMdWorklistQuery, GetProjectDataQuery,
    GetProjectFastaQuery,
};
use super::store::ProjectStore;
use crate::error::AppError;

/// Content type of the downloadable exports
const EXPORT_CONTENT_TYPE: &str = "application/text";

pub fn projects_routes() -> Router<Arc<dyn ProjectStore>> {
    Router::new()
        .route("/data/:project_id", get(get_project_data))
        .route("/fasta/:project_id", get(get_project_fasta))
        .route("/md-worklist/:project_id", get(get_md_worklist))
}

#[tracing::instrument(skip(store))]
async fn get_project_data(
    State(store): State<Arc<dyn ProjectStore>>,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let body = get_data::handle(store.as_ref(), GetProjectDataQuery { project_id }).await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[tracing::instrument(skip(store))]
async fn get_project_fasta(
    State(store): State<Arc<dyn ProjectStore>>,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let filename = format!("{}.fasta", project_id);
    let body = get_fasta::handle(store.as_ref(), GetProjectFastaQuery { project_id }).await?;

    Ok(attachment(&filename, body))
}

#[tracing::instrument(skip(store))]
async fn get_md_worklist(
    State(store): State<Arc<dyn ProjectStore>>,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let filename = format!("{}_worklist.txt", project_id);
    let body = get_md_worklist::handle(store.as_ref(), GetMdWorklistQuery { project_id }).await?;

    Ok(attachment(&filename, body))
}

/// Project ids are validated before any body is produced, so `filename`
/// only holds header-safe characters here.
fn attachment(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response()
}
