//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::annotation::AnnotationError;
use crate::api::response::ErrorResponse;
use crate::features::projects::ProjectError;

/// Application error types
///
/// Everything a handler can fail with ends up here and is rendered as the
/// shared error envelope.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Annotation(err) => match err {
                AnnotationError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
                AnnotationError::Network { .. } => StatusCode::BAD_GATEWAY,
                AnnotationError::Lookup { .. } => StatusCode::NOT_FOUND,
                AnnotationError::Parse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                AnnotationError::Format { .. } => StatusCode::BAD_GATEWAY,
                AnnotationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                AnnotationError::Io { .. }
                | AnnotationError::Serialization(_)
                | AnnotationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Project(err) => match err {
                ProjectError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
                ProjectError::NotFound { .. } => StatusCode::NOT_FOUND,
                ProjectError::Render { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Annotation(err) => err.code(),
            AppError::Project(ProjectError::InvalidIdentifier { .. }) => "BAD_REQUEST",
            AppError::Project(ProjectError::NotFound { .. }) => "NOT_FOUND",
            AppError::Project(ProjectError::Render { .. }) => "INTERNAL_ERROR",
        }
    }

    fn target(&self) -> Option<&str> {
        match self {
            AppError::Annotation(err) => err.target(),
            AppError::Project(err) => Some(err.project_id()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Request failed with internal error");
            "An internal error occurred".to_string()
        } else {
            if status.is_server_error() {
                tracing::warn!(code = self.code(), error = %self, "Upstream failure");
            }
            self.to_string()
        };

        let body = match self.target() {
            Some(target) => {
                ErrorResponse::with_details(self.code(), message, json!({ "target": target }))
            },
            None => ErrorResponse::new(self.code(), message),
        };

        body.with_status(status)
    }
}
