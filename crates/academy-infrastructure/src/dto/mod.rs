//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of every stored document.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! ### Profile Version History
//! - **1.0.0**: personalInfo, location, academyInfo
//! - **1.1.0**: Added `preferences`
//!
//! ### Config Version History
//! - **1.0.0**: `api`, `storage` and `logging` sections
//!
//! ### Player / Coach / Event / Group Version History
//! - **1.0.0**: Browser-era records; numeric or string ids, groups referenced
//!   by numeric id or by name
//! - **2.0.0**: String ids, typed `GroupRef` references

mod coach;
mod config;
mod event;
mod group;
pub(crate) mod legacy;
mod player;
mod profile;

use serde::Serialize;
use serde::de::DeserializeOwned;

use academy_core::entity::Entity;

pub use coach::{CoachV1_0_0, CoachV2_0_0, create_coach_migrator};
pub use config::{ConfigDTO, ConfigV1_0_0, create_config_migrator};
pub use event::{EventV1_0_0, EventV2_0_0, create_event_migrator};
pub use group::{GroupV1_0_0, GroupV2_0_0, create_group_migrator};
pub use player::{PlayerV1_0_0, PlayerV2_0_0, create_player_migrator};
pub use profile::{ProfileDTO, ProfileV1_0, ProfileV1_1, create_profile_migrator};

/// An entity persisted through a versioned migration path named after
/// [`Entity::ENTITY_NAME`].
pub trait StoredEntity: Entity + Serialize + DeserializeOwned {
    fn create_migrator() -> version_migrate::Migrator;
}
