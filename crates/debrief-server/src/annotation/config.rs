//! Annotation pipeline configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default UniProtKB search endpoint (TSV capable)
pub const DEFAULT_UNIPROT_SEARCH_URL: &str = "https://rest.uniprot.org/uniprotkb/search";

/// Default RCSB FASTA download endpoint, `{id}` is replaced by the structure id
pub const DEFAULT_STRUCTURE_URL_TEMPLATE: &str = "https://www.rcsb.org/fasta/entry/{id}/download";

pub const STRUCTURE_ID_PLACEHOLDER: &str = "{id}";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_DEADLINE_SECS: u64 = 120;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
pub const DEFAULT_XREF_CONCURRENCY: usize = 1;

/// What to do when one cross-referenced structure cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record an error marker for that structure and keep going
    #[default]
    Collect,
    /// Abort the whole request on the first failure
    FailFast,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collect" => Ok(FailurePolicy::Collect),
            "fail-fast" | "fail_fast" | "failfast" => Ok(FailurePolicy::FailFast),
            other => Err(format!(
                "Unknown cross-reference failure policy '{}' (expected 'collect' or 'fail-fast')",
                other
            )),
        }
    }
}

/// Upstream endpoints and reliability knobs for the annotation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    pub uniprot_search_url: String,

    /// Must contain `{id}`
    pub structure_url_template: String,

    /// Timeout for each outbound HTTP call
    pub http_timeout_secs: u64,

    /// Deadline for a whole `/result` request
    pub request_deadline_secs: u64,

    /// Attempts per outbound call (1 = no retry)
    pub max_retries: u32,

    /// First backoff delay; doubles on every further attempt
    pub retry_backoff_ms: u64,

    pub xref_concurrency: usize,
    pub xref_failure_policy: FailurePolicy,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            uniprot_search_url: DEFAULT_UNIPROT_SEARCH_URL.to_string(),
            structure_url_template: DEFAULT_STRUCTURE_URL_TEMPLATE.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            request_deadline_secs: DEFAULT_REQUEST_DEADLINE_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            xref_concurrency: DEFAULT_XREF_CONCURRENCY,
            xref_failure_policy: FailurePolicy::default(),
        }
    }
}

impl AnnotationConfig {
    /// Download URL for one structure
    pub fn structure_url(&self, structure_id: &str) -> String {
        self.structure_url_template
            .replace(STRUCTURE_ID_PLACEHOLDER, structure_id)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [
            ("UniProt search URL", &self.uniprot_search_url),
            ("Structure URL template", &self.structure_url_template),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{} must start with http:// or https://", name));
            }
        }

        if !self.structure_url_template.contains(STRUCTURE_ID_PLACEHOLDER) {
            return Err(format!(
                "Structure URL template must contain the {} placeholder",
                STRUCTURE_ID_PLACEHOLDER
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err("HTTP timeout must be greater than 0".to_string());
        }

        if self.request_deadline_secs == 0 {
            return Err("Request deadline must be greater than 0".to_string());
        }

        if self.max_retries == 0 {
            return Err("Max retries must be at least 1".to_string());
        }

        if self.xref_concurrency == 0 {
            return Err("Cross-reference concurrency must be at least 1".to_string());
        }

        Ok(())
    }
}
