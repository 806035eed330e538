//! Generic entity collection repository.
//!
//! A collection is stored under [`Entity::STORAGE_KEY`] as a JSON array of
//! flat versioned records. Records without a `version` field come from the
//! browser-era application and are read as schema 1.0.0: those without an id
//! get one derived from their content, and group references holding a group
//! name are pointed at the stored group with that name.

use std::marker::PhantomData;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use super::run_blocking;
use crate::dto::StoredEntity;
use crate::dto::legacy::{derived_id, ensure_version, legacy_id};
use crate::storage::LocalStorage;
use academy_core::entity::{
    Entity, EntityRepository, Group, new_entity_id, resolve_group_names,
};
use academy_core::error::{AcademyError, Result};
use academy_core::profile::strip_nulls;
use academy_core::store::{StorageEvent, keys};

pub struct JsonEntityRepository<T> {
    storage: LocalStorage,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonEntityRepository<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: StoredEntity> JsonEntityRepository<T> {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }

    /// Parses and migrates a stored collection.
    ///
    /// A blank or `null` document is an empty collection; anything else that
    /// is not an array of records is an error.
    fn decode(storage: &LocalStorage, raw: Option<String>) -> Result<Vec<T>> {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Ok(Vec::new());
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => return Ok(Vec::new()),
            Ok(other) => {
                error!(key = T::STORAGE_KEY, "Stored collection is not an array");
                return Err(AcademyError::json(format!(
                    "Corrupt '{}' collection: expected an array, found {}",
                    T::STORAGE_KEY,
                    if other.is_object() { "an object" } else { "a scalar" }
                )));
            }
            Err(e) => {
                error!(key = T::STORAGE_KEY, error = %e, "Stored collection is not valid JSON");
                return Err(AcademyError::json(format!(
                    "Corrupt '{}' collection: {}",
                    T::STORAGE_KEY,
                    e
                )));
            }
        };

        let legacy = items
            .iter()
            .filter(|item| item.get("version").is_none())
            .count();
        if legacy > 0 {
            warn!(
                key = T::STORAGE_KEY,
                count = legacy,
                "Migrating {} records without schema version",
                T::ENTITY_NAME
            );
        }

        let groups = if legacy > 0 && T::STORAGE_KEY != keys::PLAYER_GROUPS {
            Self::stored_groups(storage)
        } else {
            Vec::new()
        };

        let migrator = T::create_migrator();
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| -> Result<T> {
                let item = strip_nulls(item);
                let is_legacy = item.get("version").is_none();
                let seed = item
                    .get("id")
                    .and_then(legacy_id)
                    .is_none()
                    .then(|| item.to_string());

                let mut record: T = migrator
                    .load_flat_from(T::ENTITY_NAME, ensure_version(item))
                    .map_err(|e| {
                        error!(key = T::STORAGE_KEY, error = %e, "Failed to migrate stored record");
                        AcademyError::from(e)
                    })?;

                if record.id().trim().is_empty() {
                    if let Some(seed) = &seed {
                        record.set_id(derived_id(T::ENTITY_NAME, index, seed));
                    }
                }
                if is_legacy {
                    resolve_group_names(&mut record, &groups);
                }
                Ok(record)
            })
            .collect()
    }

    /// Stored groups, for resolving legacy name references. An unreadable
    /// group collection leaves the references as they are.
    fn stored_groups(storage: &LocalStorage) -> Vec<Group> {
        let groups = storage
            .get_item(keys::PLAYER_GROUPS)
            .map_err(AcademyError::from)
            .and_then(|raw| JsonEntityRepository::<Group>::decode(storage, raw));
        match groups {
            Ok(groups) => groups,
            Err(e) => {
                warn!(
                    key = T::STORAGE_KEY,
                    error = %e,
                    "Group names of legacy records left unresolved"
                );
                Vec::new()
            }
        }
    }

    fn encode(items: &[T]) -> Result<String> {
        let migrator = T::create_migrator();
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let json = migrator.save_domain_flat(T::ENTITY_NAME, item)?;
            records.push(serde_json::from_str::<Value>(&json)?);
        }
        Ok(serde_json::to_string(&records)?)
    }

    fn list_sync(storage: &LocalStorage) -> Result<Vec<T>> {
        let items = Self::decode(storage, storage.get_item(T::STORAGE_KEY)?)?;
        debug!(key = T::STORAGE_KEY, count = items.len(), "Loaded collection");
        Ok(items)
    }

    /// Locked read-modify-write of the whole collection.
    ///
    /// `f` returns whether it changed the collection, and a result. The
    /// collection is only written back when it changed.
    fn mutate<R, F>(storage: &LocalStorage, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<(bool, R)>,
    {
        storage.update_item(T::STORAGE_KEY, |current| {
            let mut items = Self::decode(storage, current)?;
            let (changed, result) = f(&mut items)?;
            let next = if changed {
                Some(Self::encode(&items)?)
            } else {
                None
            };
            Ok((next, result))
        })
    }
}

#[async_trait::async_trait]
impl<T: StoredEntity> EntityRepository<T> for JsonEntityRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let storage = self.storage.clone();
        run_blocking(move || Self::list_sync(&storage)).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let storage = self.storage.clone();
        let id = id.to_string();
        run_blocking(move || {
            Ok(Self::list_sync(&storage)?
                .into_iter()
                .find(|item| item.id() == id))
        })
        .await
    }

    async fn add(&self, entity: T) -> Result<T> {
        let storage = self.storage.clone();
        let added = run_blocking(move || {
            let mut entity = entity;
            if entity.id().trim().is_empty() {
                entity.set_id(new_entity_id());
            }
            Self::mutate(&storage, |items| {
                if items.iter().any(|item| item.id() == entity.id()) {
                    return Err(AcademyError::duplicate(T::ENTITY_NAME, entity.id()));
                }
                items.push(entity.clone());
                Ok((true, entity))
            })
        })
        .await?;

        info!(entity = T::ENTITY_NAME, id = added.id(), "Added record");
        Ok(added)
    }

    async fn update(&self, id: &str, patch: T::Patch) -> Result<T> {
        let storage = self.storage.clone();
        let id = id.to_string();
        let updated = run_blocking(move || {
            Self::mutate(&storage, |items| {
                let item = items
                    .iter_mut()
                    .find(|item| item.id() == id)
                    .ok_or_else(|| AcademyError::not_found(T::ENTITY_NAME, id.clone()))?;
                let mut patched = item.clone();
                patched.apply(patch);
                if let Err(errors) = patched.validate() {
                    warn!(entity = T::ENTITY_NAME, id = %id, "Rejected invalid update");
                    return Err(errors.into());
                }
                *item = patched.clone();
                Ok((true, patched))
            })
        })
        .await?;

        info!(entity = T::ENTITY_NAME, id = updated.id(), "Updated record");
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let storage = self.storage.clone();
        let id_owned = id.to_string();
        let removed = run_blocking(move || {
            Self::mutate(&storage, |items| {
                let before = items.len();
                items.retain(|item| item.id() != id_owned);
                let removed = items.len() != before;
                Ok((removed, removed))
            })
        })
        .await?;

        if removed {
            info!(entity = T::ENTITY_NAME, id, "Removed record");
        } else {
            debug!(entity = T::ENTITY_NAME, id, "Nothing to remove");
        }
        Ok(removed)
    }

    async fn replace_all(&self, items: Vec<T>) -> Result<()> {
        let storage = self.storage.clone();
        let count = items.len();
        run_blocking(move || {
            let json = Self::encode(&items)?;
            storage.set_item(T::STORAGE_KEY, &json)?;
            Ok(())
        })
        .await?;
        info!(key = T::STORAGE_KEY, count, "Replaced collection");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.storage.subscribe_key(T::STORAGE_KEY)
    }
}
