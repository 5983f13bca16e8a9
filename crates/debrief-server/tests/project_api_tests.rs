//! Integration tests for the project export routes

use axum::http::StatusCode;
use serde_json::json;
use wiremock::MockServer;

mod common;
use common::TestApp;

#[tokio::test]
async fn test_project_data_document() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(&upstream);

    let response = app.get("/data/demo").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.json(),
        json!({
            "mutations": [{"position": 12, "wt": "A", "mut": "G"}],
            "pdb": {"id": "1ABC"}
        })
    );
    // Three-space indentation, keys sorted
    assert!(response.text().starts_with("{\n   \"mutations\": [\n      {\n         \"mut\""));
}

#[tokio::test]
async fn test_project_fasta_attachment() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(&upstream);

    let response = app.get("/fasta/demo").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("application/text"));
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=demo.fasta")
    );
    assert_eq!(response.text(), ">design_1\nMKVLAAG\n>design_2\nMKVLAPG\n");
}

#[tokio::test]
async fn test_project_md_worklist_attachment() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(&upstream);

    let response = app.get("/md-worklist/demo").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=demo_worklist.txt")
    );
    assert_eq!(
        response.text(),
        "Mutations\tb factors\tCross correlation matrix\n\
         A12G\t0.25\tccm_1.txt\n\
         P44L\t0.5\tccm_2.txt"
    );
}

#[tokio::test]
async fn test_unknown_project_is_404() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(&upstream);

    for uri in ["/data/missing", "/fasta/missing", "/md-worklist/missing"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);

        let body = response.json();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["details"]["target"], "missing");
    }
}

#[tokio::test]
async fn test_invalid_project_id_is_400() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(&upstream);

    let response = app.get("/fasta/.hidden").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.header("content-disposition").is_none());
}
