//! Coach DTOs and migrations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use super::StoredEntity;
use super::legacy::{legacy_id, legacy_refs, legacy_text, legacy_u32};
use academy_core::entity::{Coach, CoachStatus, Entity, GroupRef};

/// Coach V1.0.0 (browser-era record; groups referenced by numeric id).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct CoachV1_0_0 {
    pub id: Value,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Value,
    #[serde(alias = "specialty")]
    pub speciality: String,
    /// Years as a number or free text such as `"5 ans"`.
    #[serde(alias = "experienceYears")]
    pub experience: Value,
    pub groups: Value,
    pub status: String,
}

/// Coach V2.0.0 (string id, typed group references).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct CoachV2_0_0 {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub speciality: String,
    pub experience_years: u32,
    pub groups: Vec<GroupRef>,
    pub status: CoachStatus,
}

impl MigratesTo<CoachV2_0_0> for CoachV1_0_0 {
    fn migrate(self) -> CoachV2_0_0 {
        CoachV2_0_0 {
            id: legacy_id(&self.id).unwrap_or_default(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: legacy_text(&self.phone),
            speciality: self.speciality,
            experience_years: legacy_u32(&self.experience).unwrap_or(0),
            groups: legacy_refs(&self.groups),
            status: CoachStatus::from_str(self.status.trim()).unwrap_or_default(),
        }
    }
}

impl IntoDomain<Coach> for CoachV2_0_0 {
    fn into_domain(self) -> Coach {
        Coach {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            speciality: self.speciality,
            experience_years: self.experience_years,
            groups: self.groups,
            status: self.status,
        }
    }
}

impl FromDomain<Coach> for CoachV2_0_0 {
    fn from_domain(coach: Coach) -> Self {
        CoachV2_0_0 {
            id: coach.id,
            first_name: coach.first_name,
            last_name: coach.last_name,
            email: coach.email,
            phone: coach.phone,
            speciality: coach.speciality,
            experience_years: coach.experience_years,
            groups: coach.groups,
            status: coach.status,
        }
    }
}

/// Creates a Migrator for Coach records.
pub fn create_coach_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define(Coach::ENTITY_NAME)
        .from::<CoachV1_0_0>()
        .step::<CoachV2_0_0>()
        .into_with_save::<Coach>();
    migrator
        .register(path)
        .expect("Failed to register coach migration path");
    migrator
}

impl StoredEntity for Coach {
    fn create_migrator() -> version_migrate::Migrator {
        create_coach_migrator()
    }
}
