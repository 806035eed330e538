//! Wiring of the portal's services.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use academy_core::config::AcademyConfig;
use academy_core::entity::{Coach, Event, Group, Player};
use academy_core::error::Result;
use academy_core::store::StorageEvent;
use academy_infrastructure::{
    AcademyPaths, ConfigService, HttpAuthApi, JsonEntityRepository, JsonProfileRepository,
    LocalStorage, LocalTokenStore,
};

use crate::{AuthUseCase, ProfileService, RosterService};

/// Every service of the portal, built over one storage directory.
pub struct AcademyApp {
    config: AcademyConfig,
    storage: LocalStorage,
    logs_dir: PathBuf,
    pub auth: AuthUseCase,
    pub profile: ProfileService,
    pub roster: RosterService,
}

impl AcademyApp {
    /// Loads `config.toml` (plus environment overrides) from `paths` and
    /// builds the services.
    pub fn bootstrap(paths: &AcademyPaths) -> Result<Self> {
        let config = ConfigService::from_paths(paths)?.get_config()?;
        Self::from_config(config, paths)
    }

    /// Builds the services; `storage.data_dir` replaces the data directory
    /// of `paths` when set.
    pub fn from_config(config: AcademyConfig, paths: &AcademyPaths) -> Result<Self> {
        let data_paths = match &config.storage.data_dir {
            Some(dir) => AcademyPaths::new(Some(dir.clone())),
            None => paths.clone(),
        };
        let storage = LocalStorage::new(data_paths.storage_dir()?);
        let logs_dir = data_paths.logs_dir()?;

        let api = Arc::new(HttpAuthApi::new(&config.api)?);
        let profiles = Arc::new(JsonProfileRepository::new(storage.clone()));
        let tokens = Arc::new(LocalTokenStore::new(storage.clone()));

        let roster = RosterService::new(
            Arc::new(JsonEntityRepository::<Player>::new(storage.clone())),
            Arc::new(JsonEntityRepository::<Coach>::new(storage.clone())),
            Arc::new(JsonEntityRepository::<Event>::new(storage.clone())),
            Arc::new(JsonEntityRepository::<Group>::new(storage.clone())),
        );

        info!(
            storage = %storage.root().display(),
            api = %config.api.base_url,
            "Academy portal ready"
        );

        Ok(Self {
            auth: AuthUseCase::new(api, profiles.clone(), tokens),
            profile: ProfileService::new(profiles),
            roster,
            config,
            storage,
            logs_dir,
        })
    }

    pub fn config(&self) -> &AcademyConfig {
        &self.config
    }

    /// Directory for the daily log file, see [`crate::init_logging`].
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Changes to any stored document.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.storage.subscribe()
    }
}
