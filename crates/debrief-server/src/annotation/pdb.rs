//! PDB cross-reference resolution
//!
//! Downloads the FASTA file of a structure and reshapes it into
//! `{id, chains}`. RCSB labels each record with the structure id, one
//! separator and a chain (or entity) code, e.g. `1ABC:A|PDBID|CHAIN|SEQUENCE`
//! or `1ABC_1|Chains A, B|...`.

use async_trait::async_trait;
use debrief_common::fasta::{self, FastaRecord};
use debrief_common::DebriefError;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::StructureRecord;
use super::{AnnotationConfig, AnnotationError, HttpFetcher, Result};

/// A public structure repository serving FASTA files
#[async_trait]
pub trait StructureRepository: Send + Sync {
    /// Raw FASTA text for `structure_id`; `Lookup` if the id is unknown
    async fn fetch_fasta(&self, structure_id: &str) -> Result<String>;
}

/// RCSB PDB over HTTP
pub struct RcsbRepository {
    http: HttpFetcher,
    config: AnnotationConfig,
}

impl RcsbRepository {
    pub fn new(http: HttpFetcher, config: AnnotationConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl StructureRepository for RcsbRepository {
    async fn fetch_fasta(&self, structure_id: &str) -> Result<String> {
        let url = self.config.structure_url(structure_id);
        self.http
            .get_text(&url, &[], structure_id)
            .await?
            .ok_or_else(|| AnnotationError::lookup(structure_id))
    }
}

/// Split a cross-reference field into structure ids
///
/// `"1ABC;1DEF;"` gives `["1ABC", "1DEF"]`: tokens are trimmed and empty
/// ones dropped.
pub fn split_cross_references(field: &str) -> Vec<String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Chain code of a record label, given the structure id it belongs to
///
/// The label must start with `structure_id` (case-insensitive) followed by
/// one separator; the code is the alphanumeric run after it.
pub fn chain_code<'a>(label: &'a str, structure_id: &str) -> Option<&'a str> {
    let prefix = label.get(..structure_id.len())?;
    if !prefix.eq_ignore_ascii_case(structure_id) {
        return None;
    }

    let mut rest = label[structure_id.len()..].chars();
    rest.next()?;
    let rest = rest.as_str();

    let len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    (len > 0).then(|| &rest[..len])
}

/// Build the chain mapping from parsed records
pub fn structure_from_records(
    structure_id: &str,
    records: &[FastaRecord],
) -> Result<StructureRecord> {
    if records.is_empty() {
        return Err(AnnotationError::format(structure_id, "FASTA file has no records"));
    }

    let mut chains = BTreeMap::new();
    for record in records {
        let code = chain_code(record.id(), structure_id).ok_or_else(|| {
            AnnotationError::format(
                structure_id,
                format!("record label '{}' has no chain code", record.id()),
            )
        })?;
        chains.insert(code.to_string(), record.sequence.clone());
    }

    Ok(StructureRecord {
        id: structure_id.to_string(),
        chains,
    })
}

/// Resolves structure ids into chain sequences
#[derive(Clone)]
pub struct StructureResolver {
    repository: Arc<dyn StructureRepository>,
}

impl StructureResolver {
    pub fn new(repository: Arc<dyn StructureRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, structure_id: &str) -> Result<StructureRecord> {
        let text = self.repository.fetch_fasta(structure_id).await?;

        let id = structure_id.to_string();
        let records = tokio::task::spawn_blocking(move || spool_and_parse(&id, &text))
            .await
            .map_err(|e| AnnotationError::Internal(format!("FASTA parse task failed: {}", e)))??;

        let structure = structure_from_records(structure_id, &records)?;
        debug!(chains = structure.chains.len(), "Resolved structure");
        Ok(structure)
    }
}

/// Write the download to a temporary file and parse it back
///
/// The file is removed when the handle drops, on success and on error.
fn spool_and_parse(structure_id: &str, text: &str) -> Result<Vec<FastaRecord>> {
    let io_error = |source| AnnotationError::Io {
        target: structure_id.to_string(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix("debrief-")
        .suffix(".fasta")
        .tempfile()
        .map_err(io_error)?;
    file.write_all(text.as_bytes()).map_err(io_error)?;
    file.flush().map_err(io_error)?;

    fasta::parse_file(file.path()).map_err(|e| match e {
        DebriefError::Io(source) => io_error(source),
        other => AnnotationError::format(structure_id, other.to_string()),
    })
}
