//! Configuration service implementation.
//!
//! Loads the versioned `config.toml` (see [`AcademyPaths::config_file`])
//! through version-migrate's `FileStorage`, applies the `ACADEMY_*`
//! environment overrides and caches the result.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use crate::dto::create_config_migrator;
use crate::paths::AcademyPaths;
use academy_core::config::AcademyConfig;
use academy_core::error::{AcademyError, Result};

const CONFIG_KEY: &str = "config";

/// Overrides `api.base_url`.
pub const ENV_API_BASE_URL: &str = "ACADEMY_API_BASE_URL";
/// Overrides `storage.data_dir`.
pub const ENV_DATA_DIR: &str = "ACADEMY_DATA_DIR";
/// Overrides `logging.level`.
pub const ENV_LOG: &str = "ACADEMY_LOG";

/// Configuration service that loads and caches [`AcademyConfig`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration; `None` until first access or after invalidation.
    config: Arc<RwLock<Option<AcademyConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the given file. Nothing is read until the
    /// first [`get_config`](Self::get_config).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading the platform `config.toml`.
    pub fn from_paths(paths: &AcademyPaths) -> Result<Self> {
        Ok(Self::new(paths.config_file()?))
    }

    /// Gets the configuration, loading it if not cached.
    ///
    /// A missing file is created with the defaults; an unreadable or
    /// malformed file is an error.
    pub fn get_config(&self) -> Result<AcademyConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let mut loaded = self.load_file()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = None;
    }

    /// Writes `config` to the file and drops the cached value.
    pub fn save_config(&self, config: &AcademyConfig) -> Result<()> {
        let mut storage = self.open_storage()?;
        storage
            .update_and_save(CONFIG_KEY, vec![config.clone()])
            .map_err(|e| self.config_error("Failed to save", e))?;
        info!(path = %self.path.display(), "Saved configuration");
        self.invalidate_cache();
        Ok(())
    }

    /// Reads the file, writing the defaults when it has no configuration yet.
    fn load_file(&self) -> Result<AcademyConfig> {
        let mut storage = self.open_storage()?;
        let configs: Vec<AcademyConfig> = storage
            .query(CONFIG_KEY)
            .map_err(|e| self.config_error("Failed to query", e))?;

        match configs.into_iter().next() {
            Some(config) => {
                info!(path = %self.path.display(), "Loaded configuration");
                Ok(config)
            }
            None => {
                debug!(path = %self.path.display(), "No configuration stored, writing defaults");
                let config = AcademyConfig::default();
                storage
                    .update_and_save(CONFIG_KEY, vec![config.clone()])
                    .map_err(|e| self.config_error("Failed to save default", e))?;
                Ok(config)
            }
        }
    }

    fn open_storage(&self) -> Result<FileStorage> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AcademyError::io(format!(
                    "Failed to create config directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);
        FileStorage::new(self.path.clone(), create_config_migrator(), strategy)
            .map_err(|e| self.config_error("Failed to load", e))
    }

    fn config_error(&self, action: &str, err: impl std::fmt::Display) -> AcademyError {
        AcademyError::config(format!(
            "{} config file '{}': {}",
            action,
            self.path.display(),
            err
        ))
    }
}

/// Applies `ACADEMY_*` overrides; blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut AcademyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_API_BASE_URL) {
        config.api.base_url = url;
    }
    if let Some(dir) = get(ENV_DATA_DIR) {
        config.storage.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(level) = get(ENV_LOG) {
        config.logging.level = level;
    }
}
