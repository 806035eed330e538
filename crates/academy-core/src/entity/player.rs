use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::{Entity, GroupRef};
use crate::store::keys;
use crate::validation::{FieldError, FormErrors};

/// Player record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Birth date as `YYYY-MM-DD`; empty when unknown.
    pub birth_date: String,
    pub position: String,
    pub jersey_number: Option<u32>,
    pub group: Option<GroupRef>,
    pub subgroup: Option<String>,
    pub status: PlayerStatus,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Active,
    Injured,
    Suspended,
    Inactive,
}

/// Partial update of a [`Player`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<Option<u32>>,
    pub group: Option<Option<GroupRef>>,
    pub subgroup: Option<Option<String>>,
    pub status: Option<PlayerStatus>,
}

impl Entity for Player {
    const STORAGE_KEY: &'static str = keys::PLAYERS;
    const ENTITY_NAME: &'static str = "player";
    type Patch = PlayerPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: PlayerPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.birth_date {
            self.birth_date = v;
        }
        if let Some(v) = patch.position {
            self.position = v;
        }
        if let Some(v) = patch.jersey_number {
            self.jersey_number = v;
        }
        if let Some(v) = patch.group {
            self.group = v;
        }
        if let Some(v) = patch.subgroup {
            self.subgroup = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        check_player(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.birth_date,
        )
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.position.as_str(),
        ]
    }

    fn group_refs(&self) -> Vec<&GroupRef> {
        self.group.iter().collect()
    }

    fn group_refs_mut(&mut self) -> Vec<&mut GroupRef> {
        self.group.iter_mut().collect()
    }
}

/// Values typed into the "add player" form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPlayerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String,
    pub position: String,
    pub jersey_number: Option<u32>,
    pub group: Option<GroupRef>,
    pub subgroup: Option<String>,
}

impl NewPlayerForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        check_player(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.birth_date,
        )
    }

    /// Builds the record; the repository assigns the id.
    pub fn into_player(self) -> Player {
        Player {
            id: String::new(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            birth_date: self.birth_date.trim().to_string(),
            position: self.position.trim().to_string(),
            jersey_number: self.jersey_number,
            group: self.group,
            subgroup: self.subgroup.filter(|s| !s.trim().is_empty()),
            status: PlayerStatus::Active,
        }
    }
}

fn check_player(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    birth_date: &str,
) -> Result<(), Vec<FieldError>> {
    let mut errors = FormErrors::new();
    errors.require("firstName", first_name, "First name");
    errors.require("lastName", last_name, "Last name");
    errors.optional_email("email", email);
    errors.optional_phone("phone", phone);
    errors.optional_date("birthDate", birth_date);
    errors.finish()
}
