//! Group DTOs and migrations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use super::StoredEntity;
use super::legacy::{legacy_id, legacy_text};
use academy_core::entity::{Entity, Group};

/// Group V1.0.0 (browser-era `playerGroups` entry).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct GroupV1_0_0 {
    pub id: Value,
    pub name: String,
    #[serde(alias = "ageGroup")]
    pub category: String,
    /// Subgroup names, or objects carrying a `name`.
    pub subgroups: Vec<Value>,
    pub description: String,
}

/// Group V2.0.0 (string id, subgroup names).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
#[serde(rename_all = "camelCase", default)]
pub struct GroupV2_0_0 {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subgroups: Vec<String>,
    pub description: String,
}

impl MigratesTo<GroupV2_0_0> for GroupV1_0_0 {
    fn migrate(self) -> GroupV2_0_0 {
        // Groups were referenced by name as often as by id; a group without
        // an id keeps its name as id so those references still resolve.
        let id = legacy_id(&self.id)
            .or_else(|| {
                let name = self.name.trim();
                (!name.is_empty()).then(|| name.to_string())
            })
            .unwrap_or_default();

        let subgroups = self
            .subgroups
            .iter()
            .map(|s| match s {
                Value::Object(obj) => obj.get("name").map(legacy_text).unwrap_or_default(),
                other => legacy_text(other),
            })
            .filter(|s| !s.is_empty())
            .collect();

        GroupV2_0_0 {
            id,
            name: self.name,
            category: self.category,
            subgroups,
            description: self.description,
        }
    }
}

impl IntoDomain<Group> for GroupV2_0_0 {
    fn into_domain(self) -> Group {
        Group {
            id: self.id,
            name: self.name,
            category: self.category,
            subgroups: self.subgroups,
            description: self.description,
        }
    }
}

impl FromDomain<Group> for GroupV2_0_0 {
    fn from_domain(group: Group) -> Self {
        GroupV2_0_0 {
            id: group.id,
            name: group.name,
            category: group.category,
            subgroups: group.subgroups,
            description: group.description,
        }
    }
}

/// Creates a Migrator for Group records.
pub fn create_group_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define(Group::ENTITY_NAME)
        .from::<GroupV1_0_0>()
        .step::<GroupV2_0_0>()
        .into_with_save::<Group>();
    migrator
        .register(path)
        .expect("Failed to register group migration path");
    migrator
}

impl StoredEntity for Group {
    fn create_migrator() -> version_migrate::Migrator {
        create_group_migrator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_without_id_uses_name() {
        let migrator = create_group_migrator();
        let group: Group = migrator
            .load_flat_from(
                "group",
                json!({
                    "version": "1.0.0",
                    "name": "U12",
                    "subgroups": ["A", {"name": "B"}, ""]
                }),
            )
            .unwrap();
        assert_eq!(group.id, "U12");
        assert_eq!(group.subgroups, vec!["A".to_string(), "B".to_string()]);
    }
}
