use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::{Entity, GroupRef};
use crate::store::keys;
use crate::validation::{FieldError, FormErrors, MIN_COACH_PASSWORD_STRENGTH, password_strength};

/// Coach record.
///
/// The account password chosen at creation is validated but never stored
/// with the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
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

impl Coach {
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
pub enum CoachStatus {
    #[default]
    Active,
    #[strum(serialize = "inactive", serialize = "on leave")]
    Inactive,
}

#[derive(Debug, Clone, Default)]
pub struct CoachPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub speciality: Option<String>,
    pub experience_years: Option<u32>,
    pub groups: Option<Vec<GroupRef>>,
    pub status: Option<CoachStatus>,
}

impl Entity for Coach {
    const STORAGE_KEY: &'static str = keys::COACHES;
    const ENTITY_NAME: &'static str = "coach";
    type Patch = CoachPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: CoachPatch) {
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
        if let Some(v) = patch.speciality {
            self.speciality = v;
        }
        if let Some(v) = patch.experience_years {
            self.experience_years = v;
        }
        if let Some(v) = patch.groups {
            self.groups = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        contact_errors(&self.first_name, &self.last_name, &self.email, &self.phone).finish()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.speciality.as_str(),
        ]
    }

    fn group_refs(&self) -> Vec<&GroupRef> {
        self.groups.iter().collect()
    }

    fn group_refs_mut(&mut self) -> Vec<&mut GroupRef> {
        self.groups.iter_mut().collect()
    }
}

/// Values typed into the "new coach" form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCoachForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub speciality: String,
    pub experience_years: u32,
    pub groups: Vec<GroupRef>,
    pub password: String,
    pub confirm_password: String,
}

impl NewCoachForm {
    /// Validates the form; the password must score at least
    /// [`MIN_COACH_PASSWORD_STRENGTH`].
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors =
            contact_errors(&self.first_name, &self.last_name, &self.email, &self.phone);
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        } else if password_strength(&self.password) < MIN_COACH_PASSWORD_STRENGTH {
            errors.push(
                "password",
                "Password is too weak: use at least 8 characters mixing upper and lower case, digits and symbols",
            );
        }
        errors.passwords_match(&self.password, &self.confirm_password);
        errors.finish()
    }

    pub fn into_coach(self) -> Coach {
        Coach {
            id: String::new(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            speciality: self.speciality.trim().to_string(),
            experience_years: self.experience_years,
            groups: self.groups,
            status: CoachStatus::Active,
        }
    }
}

fn contact_errors(first_name: &str, last_name: &str, email: &str, phone: &str) -> FormErrors {
    let mut errors = FormErrors::new();
    errors.require("firstName", first_name, "First name");
    errors.require("lastName", last_name, "Last name");
    errors.required_email("email", email);
    errors.optional_phone("phone", phone);
    errors
}
