//! Event DTOs and migrations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use super::StoredEntity;
use super::legacy::{legacy_id, legacy_refs};
use academy_core::entity::{Entity, Event, EventKind, GroupRef};

/// Event V1.0.0 (browser-era record; groups referenced by name).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct EventV1_0_0 {
    pub id: Value,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    #[serde(alias = "time")]
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub groups: Value,
    /// Single-group form used by the training screen.
    pub group: Value,
    pub subgroup: Option<String>,
    pub description: String,
}

/// Event V2.0.0 (string id, typed group references).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct EventV2_0_0 {
    pub id: String,
    pub title: String,
    pub kind: EventKind,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub groups: Vec<GroupRef>,
    pub subgroup: Option<String>,
    pub description: String,
}

impl MigratesTo<EventV2_0_0> for EventV1_0_0 {
    fn migrate(self) -> EventV2_0_0 {
        let mut groups = legacy_refs(&self.groups);
        for group in legacy_refs(&self.group) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }

        EventV2_0_0 {
            id: legacy_id(&self.id).unwrap_or_default(),
            title: self.title,
            kind: EventKind::from_str(self.kind.trim()).unwrap_or(EventKind::Other),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            groups,
            subgroup: self.subgroup.filter(|s| !s.trim().is_empty()),
            description: self.description,
        }
    }
}

impl IntoDomain<Event> for EventV2_0_0 {
    fn into_domain(self) -> Event {
        Event {
            id: self.id,
            title: self.title,
            kind: self.kind,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            groups: self.groups,
            subgroup: self.subgroup,
            description: self.description,
        }
    }
}

impl FromDomain<Event> for EventV2_0_0 {
    fn from_domain(event: Event) -> Self {
        EventV2_0_0 {
            id: event.id,
            title: event.title,
            kind: event.kind,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location,
            groups: event.groups,
            subgroup: event.subgroup,
            description: event.description,
        }
    }
}

/// Creates a Migrator for Event records.
pub fn create_event_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define(Event::ENTITY_NAME)
        .from::<EventV1_0_0>()
        .step::<EventV2_0_0>()
        .into_with_save::<Event>();
    migrator
        .register(path)
        .expect("Failed to register event migration path");
    migrator
}

impl StoredEntity for Event {
    fn create_migrator() -> version_migrate::Migrator {
        create_event_migrator()
    }
}
