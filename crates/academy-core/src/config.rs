//! Application configuration model.
//!
//! Stored as a versioned `config.toml` in the platform config directory.
//! Every section and field has a default, so a partial document is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use version_migrate::DeriveQueryable as Queryable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "config")]
#[serde(default)]
pub struct AcademyConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Authentication backend endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub login_path: String,
    pub signup_path: String,
    /// Request timeout in seconds; no timeout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            login_path: "/api/login/".to_string(),
            signup_path: "/signup/".to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn login_url(&self) -> String {
        join_url(&self.base_url, &self.login_path)
    }

    pub fn signup_url(&self) -> String {
        join_url(&self.base_url, &self.signup_path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Where the key/value documents live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `academy_infrastructure=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Also write a daily rotated file under the data directory's `logs/`.
    pub log_to_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_to_file: false,
        }
    }
}
