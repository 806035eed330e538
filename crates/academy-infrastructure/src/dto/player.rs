//! Player DTOs and migrations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use super::StoredEntity;
use super::legacy::{legacy_id, legacy_ref, legacy_text, legacy_u32};
use academy_core::entity::{Entity, GroupRef, Player, PlayerStatus};

/// Player V1.0.0 (browser-era record, loosely typed ids and group).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerV1_0_0 {
    pub id: Value,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Value,
    pub birth_date: String,
    pub position: String,
    pub jersey_number: Value,
    /// Numeric group id or group name.
    pub group: Value,
    pub subgroup: Option<String>,
    pub status: String,
}

/// Player V2.0.0 (string id, typed group reference).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerV2_0_0 {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String,
    pub position: String,
    pub jersey_number: Option<u32>,
    pub group: Option<GroupRef>,
    pub subgroup: Option<String>,
    pub status: PlayerStatus,
}

impl MigratesTo<PlayerV2_0_0> for PlayerV1_0_0 {
    fn migrate(self) -> PlayerV2_0_0 {
        PlayerV2_0_0 {
            id: legacy_id(&self.id).unwrap_or_default(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: legacy_text(&self.phone),
            birth_date: self.birth_date,
            position: self.position,
            jersey_number: legacy_u32(&self.jersey_number),
            group: legacy_ref(&self.group),
            subgroup: self.subgroup.filter(|s| !s.trim().is_empty()),
            status: PlayerStatus::from_str(self.status.trim()).unwrap_or_default(),
        }
    }
}

impl IntoDomain<Player> for PlayerV2_0_0 {
    fn into_domain(self) -> Player {
        Player {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            birth_date: self.birth_date,
            position: self.position,
            jersey_number: self.jersey_number,
            group: self.group,
            subgroup: self.subgroup,
            status: self.status,
        }
    }
}

impl FromDomain<Player> for PlayerV2_0_0 {
    fn from_domain(player: Player) -> Self {
        PlayerV2_0_0 {
            id: player.id,
            first_name: player.first_name,
            last_name: player.last_name,
            email: player.email,
            phone: player.phone,
            birth_date: player.birth_date,
            position: player.position,
            jersey_number: player.jersey_number,
            group: player.group,
            subgroup: player.subgroup,
            status: player.status,
        }
    }
}

/// Creates a Migrator for Player records.
pub fn create_player_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define(Player::ENTITY_NAME)
        .from::<PlayerV1_0_0>()
        .step::<PlayerV2_0_0>()
        .into_with_save::<Player>();
    migrator
        .register(path)
        .expect("Failed to register player migration path");
    migrator
}

impl StoredEntity for Player {
    fn create_migrator() -> version_migrate::Migrator {
        create_player_migrator()
    }
}
