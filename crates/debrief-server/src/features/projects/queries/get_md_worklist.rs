use serde_json::Value;

use super::check_project_id;
use crate::features::projects::store::{ProjectError, ProjectStore};

pub const WORKLIST_HEADER: &str = "Mutations\tb factors\tCross correlation matrix";

#[derive(Debug, Clone)]
pub struct GetMdWorklistQuery {
    pub project_id: String,
}

impl GetMdWorklistQuery {
    pub fn validate(&self) -> Result<(), ProjectError> {
        check_project_id(&self.project_id)
    }
}

/// Header line followed by one tab-joined line per worklist row
///
/// No trailing newline after the last row.
#[tracing::instrument(skip(store))]
pub async fn handle(
    store: &dyn ProjectStore,
    query: GetMdWorklistQuery,
) -> Result<String, ProjectError> {
    query.validate()?;

    let rows = store.md_worklist(&query.project_id).await?;

    let lines = std::iter::once(WORKLIST_HEADER.to_string()).chain(rows.iter().map(|row| {
        row.iter().map(cell_text).collect::<Vec<_>>().join("\t")
    }));

    Ok(lines.collect::<Vec<_>>().join("\n"))
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
