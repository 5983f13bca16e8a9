//! Annotation pipeline orchestration
//!
//! `get_result` drives one request end to end:
//!
//! 1. Fetch the fixed field list of the entry from the annotation service
//! 2. Resolve every PDB cross-reference into chain sequences
//! 3. Parse the beta strand, helix and turn strings into ranges
//!
//! The whole run is bounded by the configured request deadline.

use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::models::{
    AnnotationField, FailureDetail, ResultRecord, StructureFailure, StructureOutcome,
    StructureRecord,
};
use super::pdb::{split_cross_references, StructureResolver};
use super::secondary_structure::parse_annotation;
use super::uniprot::{fetch_entry, AnnotationService};
use super::{AnnotationConfig, AnnotationError, FailurePolicy, Result};
use crate::features::shared::validation::{validate_identifier, MAX_IDENTIFIER_LENGTH};

/// Runtime knobs of the pipeline
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub request_deadline: Duration,
    pub xref_concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl From<&AnnotationConfig> for PipelineSettings {
    fn from(config: &AnnotationConfig) -> Self {
        Self {
            request_deadline: config.request_deadline(),
            xref_concurrency: config.xref_concurrency.max(1),
            failure_policy: config.xref_failure_policy,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&AnnotationConfig::default())
    }
}

pub struct AnnotationPipeline {
    annotations: Arc<dyn AnnotationService>,
    resolver: StructureResolver,
    settings: PipelineSettings,
}

impl AnnotationPipeline {
    pub fn new(
        annotations: Arc<dyn AnnotationService>,
        resolver: StructureResolver,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            annotations,
            resolver,
            settings,
        }
    }

    /// Build the enriched annotation record of `entry`
    #[instrument(skip(self))]
    pub async fn get_result(&self, entry: &str) -> Result<ResultRecord> {
        check_identifier(entry)?;

        let deadline = self.settings.request_deadline;
        match tokio::time::timeout(deadline, self.annotate(entry)).await {
            Ok(result) => result,
            Err(_) => Err(AnnotationError::Timeout {
                target: entry.to_string(),
                secs: deadline.as_secs(),
            }),
        }
    }

    async fn annotate(&self, entry: &str) -> Result<ResultRecord> {
        let mut record = ResultRecord::new(entry);
        record.merge(fetch_entry(self.annotations.as_ref(), entry).await?);

        let xref_key = AnnotationField::PdbCrossReference.record_key();
        let structure_ids = split_cross_references(record.text(xref_key));
        info!(structures = structure_ids.len(), "Fetched UniProt entry");

        let structures = self.resolve_structures(structure_ids).await?;
        record.insert(xref_key, serde_json::to_value(structures)?);

        for field in AnnotationField::SECONDARY_STRUCTURE {
            let key = field.record_key();
            let ranges =
                parse_annotation(record.text(key)).map_err(|source| AnnotationError::Parse {
                    target: entry.to_string(),
                    field: key.to_string(),
                    source,
                })?;
            record.insert(key, serde_json::to_value(ranges)?);
        }

        Ok(record)
    }

    /// Resolve structures in input order, honouring the failure policy
    async fn resolve_structures(&self, ids: Vec<String>) -> Result<Vec<StructureOutcome>> {
        let resolver = &self.resolver;
        let concurrency = self.settings.xref_concurrency;

        match self.settings.failure_policy {
            FailurePolicy::FailFast => {
                stream::iter(ids)
                    .map(|id| async move { resolve_one(resolver, &id).await })
                    .buffered(concurrency)
                    .map_ok(StructureOutcome::Resolved)
                    .try_collect()
                    .await
            },
            FailurePolicy::Collect => {
                let outcomes: Vec<StructureOutcome> = stream::iter(ids)
                    .map(|id| async move {
                        match resolve_one(resolver, &id).await {
                            Ok(structure) => StructureOutcome::Resolved(structure),
                            Err(err) => {
                                warn!(structure_id = %id, error = %err, "Skipping structure");
                                StructureOutcome::Failed(StructureFailure {
                                    id,
                                    error: FailureDetail {
                                        code: err.code().to_string(),
                                        message: err.to_string(),
                                    },
                                })
                            },
                        }
                    })
                    .buffered(concurrency)
                    .collect()
                    .await;
                Ok(outcomes)
            },
        }
    }
}

async fn resolve_one(
    resolver: &StructureResolver,
    structure_id: &str,
) -> Result<StructureRecord> {
    check_identifier(structure_id)?;
    resolver.resolve(structure_id).await
}

fn check_identifier(id: &str) -> Result<()> {
    validate_identifier(id, MAX_IDENTIFIER_LENGTH).map_err(|e| {
        AnnotationError::InvalidIdentifier {
            target: id.to_string(),
            reason: e.to_string(),
        }
    })
}
