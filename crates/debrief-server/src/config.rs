//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::annotation::config::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_DEADLINE_SECS,
    DEFAULT_RETRY_BACKOFF_MS, DEFAULT_STRUCTURE_URL_TEMPLATE, DEFAULT_UNIPROT_SEARCH_URL,
    DEFAULT_XREF_CONCURRENCY,
};
use crate::annotation::{AnnotationConfig, FailurePolicy};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default directory holding `index.html`, `pdb_viewer.html` and assets.
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Default CORS allowed origin.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "*";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub annotation: AnnotationConfig,
    pub static_files: StaticConfig,
    pub projects: ProjectsConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticConfig {
    pub dir: PathBuf,
}

/// Where project data is read from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// JSON project file; `None` serves an empty store
    pub file: Option<PathBuf>,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Read `key` and parse it, falling back to `default` when unset or unparsable
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from `.env`, the environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from the process environment without validating it
    pub fn from_env() -> anyhow::Result<Self> {
        let xref_failure_policy = match std::env::var("DEBRIEF_XREF_FAILURE_POLICY") {
            Ok(value) => FailurePolicy::from_str(&value).map_err(anyhow::Error::msg)?,
            Err(_) => FailurePolicy::default(),
        };

        Ok(Config {
            server: ServerConfig {
                host: std::env::var("DEBRIEF_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_or("DEBRIEF_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or(
                    "DEBRIEF_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
            },
            annotation: AnnotationConfig {
                uniprot_search_url: std::env::var("UNIPROT_SEARCH_URL")
                    .unwrap_or_else(|_| DEFAULT_UNIPROT_SEARCH_URL.to_string()),
                structure_url_template: std::env::var("RCSB_FASTA_URL_TEMPLATE")
                    .unwrap_or_else(|_| DEFAULT_STRUCTURE_URL_TEMPLATE.to_string()),
                http_timeout_secs: env_or("DEBRIEF_HTTP_TIMEOUT", DEFAULT_HTTP_TIMEOUT_SECS),
                request_deadline_secs: env_or(
                    "DEBRIEF_REQUEST_DEADLINE",
                    DEFAULT_REQUEST_DEADLINE_SECS,
                ),
                max_retries: env_or("DEBRIEF_MAX_RETRIES", DEFAULT_MAX_RETRIES),
                retry_backoff_ms: env_or("DEBRIEF_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS),
                xref_concurrency: env_or("DEBRIEF_XREF_CONCURRENCY", DEFAULT_XREF_CONCURRENCY),
                xref_failure_policy,
            },
            static_files: StaticConfig {
                dir: std::env::var("DEBRIEF_STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
            },
            projects: ProjectsConfig {
                file: std::env::var("DEBRIEF_PROJECTS_FILE")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", false),
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.host.trim().is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }

        self.annotation.validate().map_err(anyhow::Error::msg)?;

        if self.cors.allow_credentials && self.cors.allows_any_origin() {
            anyhow::bail!(
                "CORS_ALLOW_CREDENTIALS=true requires explicit CORS_ALLOWED_ORIGINS (not '*')"
            );
        }

        if !self.static_files.dir.is_dir() {
            tracing::warn!(
                dir = %self.static_files.dir.display(),
                "Static directory does not exist - page routes will return 404"
            );
        }

        if self.projects.file.is_none() {
            tracing::warn!("DEBRIEF_PROJECTS_FILE not set - project endpoints will return 404");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            annotation: AnnotationConfig::default(),
            static_files: StaticConfig {
                dir: PathBuf::from(DEFAULT_STATIC_DIR),
            },
            projects: ProjectsConfig::default(),
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DEBRIEF_HOST",
        "DEBRIEF_PORT",
        "DEBRIEF_PROJECTS_FILE",
        "DEBRIEF_XREF_CONCURRENCY",
        "DEBRIEF_XREF_FAILURE_POLICY",
        "RCSB_FASTA_URL_TEMPLATE",
        "CORS_ALLOWED_ORIGINS",
        "CORS_ALLOW_CREDENTIALS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.annotation.xref_concurrency, 1);
        assert_eq!(config.annotation.xref_failure_policy, FailurePolicy::Collect);
        assert!(config.projects.file.is_none());
        assert_eq!(config.cors.allowed_origins, vec!["*"]);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("DEBRIEF_PORT", "8080");
        std::env::set_var("DEBRIEF_PROJECTS_FILE", "/tmp/projects.json");
        std::env::set_var("DEBRIEF_XREF_CONCURRENCY", "4");
        std::env::set_var("DEBRIEF_XREF_FAILURE_POLICY", "fail-fast");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.projects.file, Some(PathBuf::from("/tmp/projects.json")));
        assert_eq!(config.annotation.xref_concurrency, 4);
        assert_eq!(config.annotation.xref_failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    #[serial]
    fn test_unknown_failure_policy_is_rejected() {
        clear_env();
        std::env::set_var("DEBRIEF_XREF_FAILURE_POLICY", "ignore");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_unparsable_port_falls_back() {
        clear_env();
        std::env::set_var("DEBRIEF_PORT", "not-a-port");
        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_wildcard_origin_with_credentials_rejected() {
        let mut config = Config::default();
        config.cors.allow_credentials = true;
        assert!(config.validate().is_err());

        config.cors.allowed_origins = vec!["https://debrief.example.org".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_annotation_config_rejected() {
        let mut config = Config::default();
        config.annotation.structure_url_template = "https://files.rcsb.org/fasta".to_string();
        assert!(config.validate().is_err());
    }
}
