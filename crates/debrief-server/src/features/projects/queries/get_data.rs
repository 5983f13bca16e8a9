use serde::Serialize;
use serde_json::{json, Value};

use super::check_project_id;
use crate::features::projects::store::{ProjectError, ProjectStore};

/// Indentation of the `/data` document
const INDENT: &[u8] = b"   ";

#[derive(Debug, Clone)]
pub struct GetProjectDataQuery {
    pub project_id: String,
}

impl GetProjectDataQuery {
    pub fn validate(&self) -> Result<(), ProjectError> {
        check_project_id(&self.project_id)
    }
}

/// Mutations and structure id of a project, as an indented JSON document
/// with sorted keys
#[tracing::instrument(skip(store))]
pub async fn handle(
    store: &dyn ProjectStore,
    query: GetProjectDataQuery,
) -> Result<String, ProjectError> {
    query.validate()?;

    let mutations = store.mutations(&query.project_id).await?;
    let pdb_id = store.pdb_id(&query.project_id).await?;

    let data = json!({
        "mutations": mutations,
        "pdb": { "id": pdb_id },
    });

    to_indented_json(&data).map_err(|e| ProjectError::Render {
        project_id: query.project_id.clone(),
        message: e.to_string(),
    })
}

fn to_indented_json(value: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::projects::store::JsonProjectStore;

    #[tokio::test]
    async fn test_document_layout() {
        let store = JsonProjectStore::from_json_str(
            r#"{"projects": {"demo": {"pdb_id": "1ABC", "mutations": [{"wt": "A", "pos": 3}]}}}"#,
        )
        .unwrap();

        let body = handle(
            &store,
            GetProjectDataQuery {
                project_id: "demo".to_string(),
            },
        )
        .await
        .unwrap();

        let expected = "{\n   \"mutations\": [\n      {\n         \"pos\": 3,\n         \"wt\": \"A\"\n      }\n   ],\n   \"pdb\": {\n      \"id\": \"1ABC\"\n   }\n}";
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_invalid_project_id() {
        let store = JsonProjectStore::empty();
        let err = handle(
            &store,
            GetProjectDataQuery {
                project_id: "../etc".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ProjectError::InvalidIdentifier { .. }));
    }
}
