use serde::{Deserialize, Serialize};

use super::Entity;
use crate::store::keys;
use crate::validation::{FieldError, FormErrors};

/// Player group (team / age category), stored under `playerGroups`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Age category, e.g. "U12".
    pub category: String,
    pub subgroups: Vec<String>,
    pub description: String,
}

impl Group {
    pub fn has_subgroup(&self, name: &str) -> bool {
        self.subgroups.iter().any(|s| s.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub subgroups: Option<Vec<String>>,
    pub description: Option<String>,
}

impl Entity for Group {
    const STORAGE_KEY: &'static str = keys::PLAYER_GROUPS;
    const ENTITY_NAME: &'static str = "group";
    type Patch = GroupPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: GroupPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.subgroups {
            self.subgroups = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        check_group(&self.name)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category.as_str()]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewGroupForm {
    pub name: String,
    pub category: String,
    pub subgroups: Vec<String>,
    pub description: String,
}

impl NewGroupForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        check_group(&self.name)
    }

    pub fn into_group(self) -> Group {
        let mut subgroups: Vec<String> = Vec::new();
        for name in self.subgroups {
            let name = name.trim().to_string();
            if !name.is_empty() && !subgroups.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
                subgroups.push(name);
            }
        }
        Group {
            id: String::new(),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            subgroups,
            description: self.description,
        }
    }
}

fn check_group(name: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = FormErrors::new();
    errors.require("name", name, "Group name");
    errors.finish()
}
