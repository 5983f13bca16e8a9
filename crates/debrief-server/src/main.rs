//! DEbrief Server - Main entry point

use anyhow::Result;
use debrief_common::logging::{init_logging, LogConfig};
use tracing::info;

use debrief_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults for this binary; environment variables take precedence
    let log_config = LogConfig::builder()
        .log_file_prefix("debrief-server")
        .filter_directives("debrief_server=debug,tower_http=debug,reqwest=info")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    info!("Starting DEbrief Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );
    info!(
        uniprot = %config.annotation.uniprot_search_url,
        structures = %config.annotation.structure_url_template,
        xref_concurrency = config.annotation.xref_concurrency,
        failure_policy = ?config.annotation.xref_failure_policy,
        "Annotation upstreams configured"
    );

    let state = api::build_state(&config)?;

    api::serve(config, state).await
}
