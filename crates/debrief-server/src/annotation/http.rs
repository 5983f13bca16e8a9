//! Shared HTTP client for upstream services

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{AnnotationConfig, AnnotationError, Result};

/// GET client with per-call timeout and retry on transient failures
///
/// Transport errors, 5xx and 429 responses are retried with exponential
/// backoff. 400, 404 and 410 mean the upstream does not know the requested
/// object and are reported as `Ok(None)` without retrying.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    backoff: Duration,
}

impl HttpFetcher {
    pub fn new(config: &AnnotationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("DEbrief/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnnotationError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            backoff: config.retry_backoff(),
        })
    }

    /// Fetch `url` as text
    ///
    /// `target` names the entry or structure being fetched and is carried
    /// into any error.
    pub async fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        target: &str,
    ) -> Result<Option<String>> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.try_get(url, query, target).await {
                Ok(Attempt::Done(body)) => return Ok(body),
                Err(err) => return Err(err),
                Ok(Attempt::Retry(err)) => {
                    warn!(
                        target_id = %target,
                        attempt,
                        max_retries = self.max_retries,
                        error = %err,
                        "Upstream request failed"
                    );
                    last_error = Some(err);

                    if attempt < self.max_retries {
                        let delay = self.backoff.saturating_mul(2u32.saturating_pow(attempt - 1));
                        info!("Retrying in {} ms", delay.as_millis());
                        tokio::time::sleep(delay).await;
                    }
                },
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AnnotationError::network(target, format!("gave up after {} attempts", self.max_retries))
        }))
    }

    async fn try_get(&self, url: &str, query: &[(&str, &str)], target: &str) -> Result<Attempt> {
        debug!(url, "GET");

        let response = match self.client.get(url).query(query).send().await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Retry(AnnotationError::network(target, e.to_string()))),
        };

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::GONE
        ) {
            return Ok(Attempt::Done(None));
        }

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::Retry(AnnotationError::network(
                target,
                format!("upstream returned HTTP {}", status),
            )));
        }

        if !status.is_success() {
            return Err(AnnotationError::network(
                target,
                format!("upstream returned HTTP {}", status),
            ));
        }

        match response.text().await {
            Ok(body) => Ok(Attempt::Done(Some(body))),
            Err(e) => Ok(Attempt::Retry(AnnotationError::network(target, e.to_string()))),
        }
    }
}

enum Attempt {
    Done(Option<String>),
    Retry(AnnotationError),
}
