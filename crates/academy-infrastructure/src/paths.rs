//! Unified path management for the portal's files.
//!
//! Platform directories are resolved via AppPaths from the version-migrate
//! crate. A base directory can replace both of them, which is what
//! `ACADEMY_DATA_DIR` and the tests use.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/academy-portal/        # Config directory
//! └── config.toml                  # Application configuration
//!
//! ~/.local/share/academy-portal/   # Data directory
//! ├── storage/                     # Key/value documents (user, token, players, ...)
//! └── logs/                        # Daily rotated log files
//! ```

use std::path::PathBuf;

use academy_core::error::{AcademyError, Result};
use version_migrate::AppPaths;

const APP_NAME: &str = "academy-portal";

#[derive(Debug, Clone, Default)]
pub struct AcademyPaths {
    base: Option<PathBuf>,
}

impl AcademyPaths {
    /// `base` replaces both platform directories when set.
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new(APP_NAME)
    }

    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .config_dir()
                .map_err(|_| AcademyError::config("Cannot find home directory")),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .data_dir()
                .map_err(|_| AcademyError::config("Cannot find home directory")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Root of the key/value store.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("storage"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let paths = AcademyPaths::new(Some(PathBuf::from("/tmp/academy")));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/academy/config.toml"));
        assert_eq!(paths.storage_dir().unwrap(), PathBuf::from("/tmp/academy/storage"));
        assert_eq!(paths.logs_dir().unwrap(), PathBuf::from("/tmp/academy/logs"));
    }

    #[test]
    fn test_platform_dirs_end_with_app_name() {
        let paths = AcademyPaths::default();
        if let Ok(dir) = paths.config_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
