pub mod response;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
};
use tracing::info;

use crate::annotation::{
    AnnotationPipeline, HttpFetcher, PipelineSettings, RcsbRepository, StructureResolver,
    UniProtClient,
};
use crate::config::Config;
use crate::features::{
    self,
    projects::{JsonProjectStore, ProjectStore},
    FeatureState,
};
use crate::middleware;

pub const INDEX_PAGE: &str = "index.html";
pub const PDB_VIEWER_PAGE: &str = "pdb_viewer.html";

/// Wire the production collaborators: UniProt and RCSB over HTTP, projects
/// from the configured file
pub fn build_state(config: &Config) -> anyhow::Result<FeatureState> {
    let http = HttpFetcher::new(&config.annotation)?;

    let annotations = UniProtClient::new(http.clone(), config.annotation.uniprot_search_url.clone());
    let structures = RcsbRepository::new(http, config.annotation.clone());

    let pipeline = AnnotationPipeline::new(
        Arc::new(annotations),
        StructureResolver::new(Arc::new(structures)),
        PipelineSettings::from(&config.annotation),
    );

    let projects: Arc<dyn ProjectStore> = match &config.projects.file {
        Some(path) => Arc::new(JsonProjectStore::from_file(path)?),
        None => Arc::new(JsonProjectStore::empty()),
    };

    Ok(FeatureState {
        pipeline: Arc::new(pipeline),
        projects,
    })
}

/// Create the application router with all routes and middleware
pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let static_dir = &config.static_files.dir;

    Router::new()
        .route("/health", get(health_check))
        .route_service("/", ServeFile::new(static_dir.join(INDEX_PAGE)))
        .route_service("/pdb_viewer", ServeFile::new(static_dir.join(PDB_VIEWER_PAGE)))
        .nest_service("/static", ServeDir::new(static_dir))
        .merge(features::router(state))
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Bind, serve and shut down gracefully on Ctrl+C / SIGTERM
pub async fn serve(config: Config, state: FeatureState) -> anyhow::Result<()> {
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
