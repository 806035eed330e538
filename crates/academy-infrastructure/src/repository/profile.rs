//! Profile repository stored under the `user` key.

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use super::run_blocking;
use crate::dto::create_profile_migrator;
use crate::storage::LocalStorage;
use academy_core::error::{AcademyError, Result};
use academy_core::profile::{
    Profile, ProfileInput, ProfileRepository, RawUserData, strip_nulls, transform,
};
use academy_core::store::{StorageEvent, keys};

const MIGRATION_KEY: &str = "profile";

/// Profile repository storing one versioned JSON document.
///
/// Documents written before versioning are normalized through the profile
/// transformer when read; the next save stores them in the current schema.
#[derive(Debug, Clone)]
pub struct JsonProfileRepository {
    storage: LocalStorage,
}

impl JsonProfileRepository {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    fn load_sync(storage: &LocalStorage) -> Result<Option<Profile>> {
        let Some(raw) = storage.get_item(keys::USER)? else {
            debug!("No stored profile");
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            error!(key = keys::USER, error = %e, "Stored profile is not valid JSON");
            AcademyError::json(format!("Corrupt '{}' document: {}", keys::USER, e))
        })?;
        let value = strip_nulls(value);
        if value.is_null() {
            return Ok(None);
        }

        if value.get("version").is_some() {
            let profile: Profile = create_profile_migrator()
                .load_flat_from(MIGRATION_KEY, value)
                .map_err(|e| {
                    error!(key = keys::USER, error = %e, "Failed to migrate stored profile");
                    AcademyError::from(e)
                })?;
            debug!("Loaded profile");
            return Ok(Some(profile));
        }

        warn!(
            key = keys::USER,
            "Stored profile has no schema version, normalizing legacy document"
        );
        let input = ProfileInput::from_json(value).map_err(|e| {
            error!(key = keys::USER, error = %e, "Unreadable legacy profile");
            e
        })?;
        Ok(Some(transform(input, &RawUserData::default())))
    }

    fn save_sync(storage: &LocalStorage, profile: &Profile) -> Result<()> {
        let json = create_profile_migrator().save_domain_flat(MIGRATION_KEY, profile)?;
        storage.set_item(keys::USER, &json)?;
        debug!("Saved profile");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileRepository for JsonProfileRepository {
    async fn load(&self) -> Result<Option<Profile>> {
        let storage = self.storage.clone();
        run_blocking(move || Self::load_sync(&storage)).await
    }

    async fn save(&self, profile: &Profile) -> Result<()> {
        let storage = self.storage.clone();
        let profile = profile.clone();
        run_blocking(move || Self::save_sync(&storage, &profile)).await
    }

    async fn clear(&self) -> Result<()> {
        let storage = self.storage.clone();
        run_blocking(move || {
            storage.remove_item(keys::USER)?;
            Ok(())
        })
        .await
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.storage.subscribe_key(keys::USER)
    }
}
