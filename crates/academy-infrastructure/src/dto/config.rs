//! Configuration file DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use academy_core::config::{AcademyConfig, ApiConfig, LoggingConfig, StorageConfig};

/// Config V1.0.0 (api, storage and logging sections).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(default)]
pub struct ConfigV1_0_0 {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Type alias for the latest Config version.
pub type ConfigDTO = ConfigV1_0_0;

impl IntoDomain<AcademyConfig> for ConfigV1_0_0 {
    fn into_domain(self) -> AcademyConfig {
        AcademyConfig {
            api: self.api,
            storage: self.storage,
            logging: self.logging,
        }
    }
}

impl FromDomain<AcademyConfig> for ConfigV1_0_0 {
    fn from_domain(config: AcademyConfig) -> Self {
        ConfigV1_0_0 {
            api: config.api,
            storage: config.storage,
            logging: config.logging,
        }
    }
}

/// Creates the Migrator for `config.toml`.
///
/// # Migration Path
///
/// - V1.0.0 → AcademyConfig
pub fn create_config_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let config_path = version_migrate::Migrator::define("config")
        .from::<ConfigV1_0_0>()
        .into_with_save::<AcademyConfig>();

    migrator
        .register(config_path)
        .expect("Failed to register config migration path");

    migrator
}
