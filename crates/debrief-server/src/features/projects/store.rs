//! Project data store
//!
//! A project pairs a PDB structure with designed mutations, the sequences
//! to export as FASTA and an MD worklist. The store is read-only at runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid project id '{project_id}': {reason}")]
    InvalidIdentifier { project_id: String, reason: String },

    #[error("Project '{project_id}' not found")]
    NotFound { project_id: String },

    #[error("Failed to render project '{project_id}': {message}")]
    Render { project_id: String, message: String },
}

impl ProjectError {
    pub fn not_found(project_id: &str) -> Self {
        ProjectError::NotFound {
            project_id: project_id.to_string(),
        }
    }

    pub fn project_id(&self) -> &str {
        match self {
            ProjectError::InvalidIdentifier { project_id, .. }
            | ProjectError::NotFound { project_id }
            | ProjectError::Render { project_id, .. } => project_id,
        }
    }
}

/// Source of per-project data
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn pdb_id(&self, project_id: &str) -> Result<String, ProjectError>;

    async fn mutations(&self, project_id: &str) -> Result<Vec<Value>, ProjectError>;

    /// Sequence id to residues
    async fn sequences(&self, project_id: &str) -> Result<BTreeMap<String, String>, ProjectError>;

    /// Worklist rows; each cell is rendered as text when exported
    async fn md_worklist(&self, project_id: &str) -> Result<Vec<Vec<Value>>, ProjectError>;
}

/// One project as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub pdb_id: String,
    #[serde(default)]
    pub mutations: Vec<Value>,
    #[serde(default)]
    pub sequences: BTreeMap<String, String>,
    #[serde(default)]
    pub md_worklist: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    projects: HashMap<String, ProjectRecord>,
}

/// Projects loaded once from a JSON document
///
/// ```json
/// {"projects": {"<id>": {"pdb_id": "1ABC", "mutations": [], "sequences": {}, "md_worklist": []}}}
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonProjectStore {
    projects: HashMap<String, ProjectRecord>,
}

impl JsonProjectStore {
    /// A store with no projects
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> debrief_common::Result<Self> {
        let file: ProjectFile = serde_json::from_str(json)?;
        Ok(Self {
            projects: file.projects,
        })
    }

    pub fn from_file(path: &Path) -> debrief_common::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        info!(path = %path.display(), projects = store.len(), "Loaded project store");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    fn project(&self, project_id: &str) -> Result<&ProjectRecord, ProjectError> {
        self.projects
            .get(project_id)
            .ok_or_else(|| ProjectError::not_found(project_id))
    }
}

#[async_trait]
impl ProjectStore for JsonProjectStore {
    async fn pdb_id(&self, project_id: &str) -> Result<String, ProjectError> {
        Ok(self.project(project_id)?.pdb_id.clone())
    }

    async fn mutations(&self, project_id: &str) -> Result<Vec<Value>, ProjectError> {
        Ok(self.project(project_id)?.mutations.clone())
    }

    async fn sequences(&self, project_id: &str) -> Result<BTreeMap<String, String>, ProjectError> {
        Ok(self.project(project_id)?.sequences.clone())
    }

    async fn md_worklist(&self, project_id: &str) -> Result<Vec<Vec<Value>>, ProjectError> {
        Ok(self.project(project_id)?.md_worklist.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PROJECTS: &str = r#"{
        "projects": {
            "demo": {
                "pdb_id": "1ABC",
                "mutations": [{"position": 12, "wt": "A", "mut": "G"}],
                "sequences": {"design_1": "MKVL"},
                "md_worklist": [["A12G", 0.5, "ccm.txt"]]
            },
            "bare": {"pdb_id": "2XYZ"}
        }
    }"#;

    #[tokio::test]
    async fn test_lookup_known_project() {
        let store = JsonProjectStore::from_json_str(PROJECTS).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.pdb_id("demo").await.unwrap(), "1ABC");
        assert_eq!(store.sequences("demo").await.unwrap()["design_1"], "MKVL");
        assert_eq!(store.md_worklist("demo").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_sections_default_to_empty() {
        let store = JsonProjectStore::from_json_str(PROJECTS).unwrap();
        assert!(store.mutations("bare").await.unwrap().is_empty());
        assert!(store.md_worklist("bare").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let store = JsonProjectStore::empty();
        let err = store.pdb_id("nope").await.unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
        assert_eq!(err.project_id(), "nope");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PROJECTS.as_bytes()).unwrap();

        let store = JsonProjectStore::from_file(file.path()).unwrap();
        assert!(!store.is_empty());
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(JsonProjectStore::from_json_str("{\"projects\": []}").is_err());
    }
}
