//! Common test utilities for DEbrief server integration tests
//!
//! UniProt and RCSB are replaced by one `wiremock` server; the router is
//! driven in-process with `tower::ServiceExt::oneshot`.
//!
//! ```no_run
//! mod common;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let upstream = wiremock::MockServer::start().await;
//!     let app = common::TestApp::new(&upstream);
//!     let response = app.get("/health").await;
//!     assert_eq!(response.status, axum::http::StatusCode::OK);
//! }
//! ```

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use debrief_server::{
    api,
    config::Config,
    features::projects::JsonProjectStore,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const UNIPROT_PATH: &str = "/uniprotkb/search";

pub const TSV_HEADER: &str = "Entry\tSequence\tPDB\tBeta strand\tHelix\tTurn";

pub const PROJECTS: &str = r#"{
    "projects": {
        "demo": {
            "pdb_id": "1ABC",
            "mutations": [{"position": 12, "wt": "A", "mut": "G"}],
            "sequences": {"design_1": "MKVLAAG", "design_2": "MKVLAPG"},
            "md_worklist": [["A12G", 0.25, "ccm_1.txt"], ["P44L", 0.5, "ccm_2.txt"]]
        }
    }
}"#;

/// A response with its body already collected
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("response body is not UTF-8")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub struct TestApp {
    pub config: Config,
    pub router: Router,
    // Keeps the static directory alive for the duration of the test
    _static_dir: TempDir,
}

impl TestApp {
    pub fn new(upstream: &MockServer) -> Self {
        Self::with_config(upstream, |_| {})
    }

    /// Build the app against `upstream`, letting the caller adjust the config
    pub fn with_config(upstream: &MockServer, adjust: impl FnOnce(&mut Config)) -> Self {
        let static_dir = TempDir::new().expect("Failed to create static dir");
        std::fs::write(static_dir.path().join("index.html"), "<h1>DEbrief</h1>").unwrap();
        std::fs::write(static_dir.path().join("pdb_viewer.html"), "<h1>PDB viewer</h1>").unwrap();
        std::fs::write(static_dir.path().join("app.js"), "console.log('debrief');").unwrap();

        let mut config = Config::default();
        config.annotation.uniprot_search_url = format!("{}{}", upstream.uri(), UNIPROT_PATH);
        config.annotation.structure_url_template =
            format!("{}/fasta/entry/{{id}}/download", upstream.uri());
        config.annotation.http_timeout_secs = 5;
        config.annotation.max_retries = 2;
        config.annotation.retry_backoff_ms = 1;
        config.static_files.dir = static_dir.path().to_path_buf();
        adjust(&mut config);

        let mut state = api::build_state(&config).expect("Failed to build state");
        state.projects = Arc::new(JsonProjectStore::from_json_str(PROJECTS).unwrap());
        let router = api::create_router(state, &config);

        Self {
            config,
            router,
            _static_dir: static_dir,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Serve a UniProt TSV body for `accession`
pub async fn mock_uniprot(server: &MockServer, accession: &str, tsv: String) {
    Mock::given(method("GET"))
        .and(path(UNIPROT_PATH))
        .and(query_param("query", format!("accession:{}", accession)))
        .and(query_param("format", "tsv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(tsv))
        .mount(server)
        .await;
}

/// Serve `fasta` as the download of `structure_id`
pub async fn mock_structure(server: &MockServer, structure_id: &str, fasta: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/fasta/entry/{}/download", structure_id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(fasta.to_string()))
        .mount(server)
        .await;
}

/// One TSV row in column order: accession, sequence, PDB, strand, helix, turn
pub fn tsv_row(
    accession: &str,
    sequence: &str,
    pdb: &str,
    strand: &str,
    helix: &str,
    turn: &str,
) -> String {
    format!(
        "{}\n{}\t{}\t{}\t{}\t{}\t{}\n",
        TSV_HEADER, accession, sequence, pdb, strand, helix, turn
    )
}
